//! CLI command implementations.

pub mod migrate;
pub mod user;

use thiserror::Error;

/// Errors shared across CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid role argument.
    #[error("Invalid role: {0}. Valid roles: admin, user")]
    InvalidRole(String),

    /// Invalid email argument.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// A conflicting record already exists.
    #[error("{0}")]
    Conflict(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Read the database URL from the environment.
pub(crate) fn database_url() -> Result<String, CliError> {
    dotenvy::dotenv().ok();
    std::env::var("CONSTRUCT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("CONSTRUCT_DATABASE_URL"))
}
