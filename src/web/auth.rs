use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::auth::{
    clear_session_cookie, hash_password, purge_expired_sessions, safe_next, session_token,
    start_session, validate_password_strength, validate_username, verify_password, MaybeUser,
};
use crate::db as queries;
use crate::error::AppResult;
use crate::web::pages::{self, FieldError};
use crate::web::AppState;

/// Signup, login and logout routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup/", get(signup_page).post(signup_post))
        .route("/auth/login/", get(login_page).post(login_post))
        .route("/auth/logout/", get(logout).post(logout))
}

#[derive(Debug, Default, Deserialize)]
pub struct NextParams {
    next: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password1: String,
    #[serde(default)]
    password2: String,
}

/// GET /auth/login/ - Show login form.
pub async fn login_page(
    MaybeUser(user): MaybeUser,
    Query(params): Query<NextParams>,
) -> Response {
    if user.is_some() {
        return Redirect::to(safe_next(params.next.as_deref())).into_response();
    }

    Html(pages::render_login_page(None, "", params.next.as_deref()).into_string()).into_response()
}

/// POST /auth/login/ - Check credentials and start a session.
pub async fn login_post(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let next = form.next.as_deref().filter(|n| !n.is_empty());
    let invalid = |message: &str| {
        Html(pages::render_login_page(Some(message), &form.username, next).into_string())
            .into_response()
    };

    if form.username.is_empty() || form.password.is_empty() {
        return Ok(invalid("Username and password are required"));
    }

    let Some(user) = queries::get_user_by_username(state.db.pool(), &form.username).await? else {
        return Ok(invalid("Invalid username or password"));
    };

    let password_valid = verify_password(&form.password, &user.password_hash).unwrap_or_else(|e| {
        error!("Password verification error: {e}");
        false
    });
    if !password_valid {
        warn!(username = %form.username, "Failed login attempt");
        return Ok(invalid("Invalid username or password"));
    }

    purge_expired_sessions(state.db.pool()).await;
    let cookie = start_session(
        state.db.pool(),
        user.id,
        state.config.session_ttl,
        state.config.cookie_secure,
    )
    .await?;

    info!(user_id = user.id, "User logged in");
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(safe_next(next))).into_response())
}

/// GET /auth/signup/ - Show signup form.
pub async fn signup_page(MaybeUser(user): MaybeUser) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(pages::render_signup_page(None, "").into_string()).into_response()
}

/// POST /auth/signup/ - Create an account and log it in.
pub async fn signup_post(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let invalid = |field: &str, message: &str| {
        Html(pages::render_signup_page(Some(FieldError::new(field, message)), username).into_string())
            .into_response()
    };

    if let Err(message) = validate_username(username) {
        return Ok(invalid("username", message));
    }
    if queries::username_exists(state.db.pool(), username).await? {
        return Ok(invalid("username", "A user with that username already exists."));
    }
    if let Err(e) = validate_password_strength(&form.password1) {
        return Ok(invalid("password1", &e.to_string()));
    }
    if form.password1 != form.password2 {
        return Ok(invalid("password2", "The two password fields didn't match."));
    }

    let password_hash = hash_password(&form.password1)?;
    let user_id = match queries::create_user(state.db.pool(), username, &password_hash).await {
        Ok(id) => id,
        Err(e) => {
            // Lost a race with another signup for the same name.
            if queries::username_exists(state.db.pool(), username).await? {
                return Ok(invalid("username", "A user with that username already exists."));
            }
            return Err(e.into());
        }
    };

    let cookie = start_session(
        state.db.pool(),
        user_id,
        state.config.session_ttl,
        state.config.cookie_secure,
    )
    .await?;

    info!(user_id, username, "User signed up");
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// GET or POST /auth/logout/ - End the current session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(token) = session_token(&headers) {
        queries::delete_session(state.db.pool(), token).await?;
        info!("User logged out");
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Html(pages::render_logged_out_page(None).into_string()),
    )
        .into_response())
}
