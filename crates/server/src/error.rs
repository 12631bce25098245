//! Application error types and HTTP response mapping.
//!
//! Internal error details are logged and reported to Sentry but never leaked
//! to API clients; responses carry generic messages for 5xx classes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::backend::BackendError;
use crate::db::RepositoryError;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request payload or parameters failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No authenticated session.
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated but lacking the required role.
    #[error("Insufficient permissions")]
    Forbidden,

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The resource existed but is no longer usable (expired invitation).
    #[error("Gone: {0}")]
    Gone(String),

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The assistant backend returned an error or was unreachable.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Anything else that should surface as a 500.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => Self::NotFound(what),
            RepositoryError::Conflict(what) => Self::Conflict(what),
            RepositoryError::Database(e) => Self::Database(e),
            RepositoryError::DataCorruption(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions".to_string()),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Self::Gone(msg) => (StatusCode::GONE, msg.clone()),
            Self::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Backend(e) => {
                error!(error = %e, "assistant backend request failed");
                sentry::capture_error(&self);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service unavailable".to_string(),
                )
            }
            Self::Database(e) => {
                error!(error = %e, "database error");
                sentry::capture_error(&self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            Self::Session(e) => {
                error!(error = %e, "session store error");
                sentry::capture_error(&self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            Self::Internal(msg) => {
                error!(error = %msg, "internal error");
                sentry::capture_error(&self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Set the Sentry user context from the current session, so errors carry
/// the acting user's identity.
pub fn set_sentry_user(user_id: i32, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context (on logout).
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
