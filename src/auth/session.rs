use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sqlx::SqlitePool;

use crate::db;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Generate a cryptographically secure random session token.
pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Create a session for `user_id` and return the `Set-Cookie` value for it.
pub async fn start_session(
    pool: &SqlitePool,
    user_id: i64,
    ttl: Duration,
    secure: bool,
) -> Result<String> {
    let token = generate_session_token();
    let ttl_secs = i64::try_from(ttl.as_secs()).context("Session TTL out of range")?;
    let expires_at = chrono::Duration::try_seconds(ttl_secs)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .context("Session TTL out of range")?
        .to_rfc3339();

    db::create_session(pool, user_id, &token, &expires_at).await?;
    Ok(session_cookie(&token, ttl_secs, secure))
}

/// `Set-Cookie` value for a session token.
#[must_use]
pub fn session_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}{secure}")
}

/// `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Extract the session token from a `Cookie` header value.
#[must_use]
pub fn token_from_cookie_header(cookies: &str) -> Option<&str> {
    cookies.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .filter(|token| !token.is_empty())
    })
}

/// Delete sessions past their expiry.
pub async fn purge_expired_sessions(pool: &SqlitePool) {
    let now = Utc::now().to_rfc3339();
    match db::delete_expired_sessions(pool, &now).await {
        Ok(count) if count > 0 => {
            tracing::info!(expired_sessions = count, "Cleaned up expired sessions");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Failed to delete expired sessions: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token() {
        let token1 = generate_session_token();
        let token2 = generate_session_token();

        assert_eq!(token1.len(), 64);
        assert_eq!(token2.len(), 64);
        assert_ne!(token1, token2); // Should be unique
        assert!(token1.chars().all(|c| c.is_alphanumeric()));
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(token_from_cookie_header("session=abc"), Some("abc"));
        assert_eq!(
            token_from_cookie_header("theme=dark; session=xyz; other=1"),
            Some("xyz")
        );
        assert_eq!(token_from_cookie_header("sessionid=nope"), None);
        assert_eq!(token_from_cookie_header("session="), None);
        assert_eq!(token_from_cookie_header(""), None);
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("tok", 60, false);
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=60"));
        assert!(!cookie.contains("Secure"));

        assert!(session_cookie("tok", 60, true).ends_with("; Secure"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
