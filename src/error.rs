//! Error taxonomy shared by the feed subsystem and the HTTP handlers.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::web::pages;

#[derive(Debug, Error)]
pub enum AppError {
    /// A referenced group, post or user does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Submitted data failed field validation.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The current user may not modify this resource.
    #[error("permission denied")]
    PermissionDenied,

    #[error("database error: {0:#}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Fallback rendering for handlers that propagate with `?`.
///
/// Validation and permission errors are normally handled in place (form
/// re-render, redirect); reaching this impl with them is a 400/403.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(_) => not_found(),
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            Self::PermissionDenied => (StatusCode::FORBIDDEN, self.to_string()).into_response(),
            Self::Database(ref e) => {
                tracing::error!("Request failed: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
            }
        }
    }
}

/// The custom 404 page.
#[must_use]
pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::render_not_found_page().into_string()),
    )
        .into_response()
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("group").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_status() {
        let response = AppError::from(anyhow::anyhow!("disk full")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_message() {
        let err = AppError::validation("text", "This field is required");
        assert_eq!(err.to_string(), "invalid text: This field is required");
        assert!(!err.is_not_found());
    }
}
