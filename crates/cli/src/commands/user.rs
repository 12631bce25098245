//! User management commands.

use chrono::{Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;

use construct_core::{Email, Role};
use construct_server::db::users::UserRepository;
use construct_server::db::{InvitationRepository, RepositoryError};
use construct_server::services::auth::hash_password;

use super::{CliError, database_url};

/// Invitations created from the CLI stay valid for 7 days.
const INVITATION_TTL_DAYS: i64 = 7;

/// Create a user directly, bypassing the invitation flow.
///
/// Intended for bootstrapping the first admin account.
///
/// # Errors
///
/// Returns `CliError` on invalid arguments, a taken email, or database
/// failure.
pub async fn create(email: &str, name: &str, role: &str, password: &str) -> Result<(), CliError> {
    let role: Role = role.parse().map_err(|_| CliError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email).map_err(|e| CliError::InvalidEmail(e.to_string()))?;

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    if UserRepository::new(&pool)
        .email_exists(&email)
        .await
        .map_err(repository_error)?
    {
        return Err(CliError::Conflict(format!(
            "A user already exists with email: {email}"
        )));
    }

    let password_hash = hash_password(password).map_err(|_| CliError::PasswordHash)?;

    let mut conn = pool.acquire().await?;
    let user = UserRepository::create_in_tx(&mut *conn, &email, name, &password_hash, role)
        .await
        .map_err(repository_error)?;

    tracing::info!("Created user {} ({}) with id {}", user.name, user.email, user.id);
    Ok(())
}

/// Create an invitation and print the registration link.
///
/// No email is sent; the link is printed for out-of-band delivery.
///
/// # Errors
///
/// Returns `CliError` on invalid arguments, a pending invitation for the
/// email, or database failure.
pub async fn invite(email: &str, name: &str, role: &str) -> Result<(), CliError> {
    let role: Role = role.parse().map_err(|_| CliError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email).map_err(|e| CliError::InvalidEmail(e.to_string()))?;

    let database_url = database_url()?;
    let base_url =
        std::env::var("CONSTRUCT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let token: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(48)
        .map(char::from)
        .collect();
    let expires_at = Utc::now() + Duration::days(INVITATION_TTL_DAYS);

    let invitation = InvitationRepository::new(&pool)
        .create(&email, name, role, None, &token, expires_at)
        .await
        .map_err(repository_error)?;

    tracing::info!("Created invitation {} for {}", invitation.id, invitation.email);
    println!(
        "{}/register?token={}",
        base_url.trim_end_matches('/'),
        invitation.token
    );
    Ok(())
}

fn repository_error(err: RepositoryError) -> CliError {
    match err {
        RepositoryError::Database(e) => CliError::Database(e),
        RepositoryError::Conflict(msg) => CliError::Conflict(msg),
        other => CliError::Conflict(other.to_string()),
    }
}
