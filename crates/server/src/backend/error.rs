//! Error types for assistant backend requests.

use thiserror::Error;

/// Errors from talking to the assistant backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network or protocol failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The backend response body did not match the expected shape.
    #[error("failed to parse backend response: {0}")]
    Parse(String),
}
