use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;

use super::session::token_from_cookie_header;
use crate::db as queries;
use crate::db::User;
use crate::error::AppError;

/// Path of the login page that auth-required routes redirect to.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Current authenticated user (if any).
/// Use this extractor when authentication is optional. A database failure
/// while resolving the session is a 500, not an anonymous request.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);

        let Some(token) = session_token(&parts.headers) else {
            return Ok(MaybeUser(None));
        };

        let session = match queries::get_session_by_token(&pool, token).await {
            Ok(Some(s)) => s,
            Ok(None) => return Ok(MaybeUser(None)),
            Err(e) => {
                return Err(AppError::from(e.context("Session lookup failed")).into_response());
            }
        };

        // Expired sessions are removed lazily on first use.
        let now = chrono::Utc::now().to_rfc3339();
        if session.expires_at < now {
            if let Err(e) = queries::delete_session(&pool, token).await {
                tracing::warn!(
                    user_id = session.user_id,
                    "Failed to delete expired session: {e:#}"
                );
            }
            return Ok(MaybeUser(None));
        }

        queries::get_user_by_id(&pool, session.user_id)
            .await
            .map(MaybeUser)
            .map_err(|e| AppError::from(e.context("User lookup failed")).into_response())
    }
}

/// Current authenticated user (required).
/// Use this extractor when authentication is mandatory.
/// Redirects to the login page (with a `next` parameter) if not logged in.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;

        match user {
            Some(u) => Ok(RequireUser(u)),
            None => Err(Redirect::to(&login_redirect_target(parts)).into_response()),
        }
    }
}

/// Session token from the request's `Cookie` header.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_cookie_header)
}

/// `/auth/login/?next=<original path and query>`.
fn login_redirect_target(parts: &Parts) -> String {
    let next = parts
        .uri
        .path_and_query()
        .map_or("/", |pq| pq.as_str());
    format!("{LOGIN_PATH}?next={}", urlencoding::encode(next))
}

/// Accept a post-login redirect only if it stays on this site.
#[must_use]
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n,
        _ => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_login_redirect_target_keeps_query() {
        let (parts, ()) = Request::builder()
            .uri("/posts/3/edit/?x=1")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(
            login_redirect_target(&parts),
            "/auth/login/?next=%2Fposts%2F3%2Fedit%2F%3Fx%3D1"
        );
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/follow/")), "/follow/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn test_session_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());

        headers.insert(header::COOKIE, "a=b; session=tok123".parse().unwrap());
        assert_eq!(session_token(&headers), Some("tok123"));
    }
}
