//! Database access layer.
//!
//! Each aggregate gets a repository struct borrowing the shared [`sqlx::PgPool`].
//! Repositories map rows into domain types and translate database failures
//! into [`RepositoryError`].

pub mod conversations;
pub mod gpts;
pub mod invitations;
pub mod users;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

pub use conversations::ConversationRepository;
pub use gpts::GptRepository;
pub use invitations::InvitationRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row failed domain validation on read.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The requested entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool from the configured database URL.
///
/// # Errors
///
/// Returns `sqlx::Error` if the initial connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Returns true if the error is a unique constraint violation on the given
/// constraint name.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
