//! Authentication service.
//!
//! Registration is invite-only: new accounts are created by accepting an
//! invitation token. Passwords are hashed with Argon2id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use construct_core::Email;

use crate::db::users::{UserCredentials, UserRepository};
use crate::db::{InvitationRepository, RepositoryError};
use crate::error::AppError;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] construct_core::EmailError),

    /// Wrong password or unknown email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too weak.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// No invitation matches the token.
    #[error("invitation not found")]
    InvitationNotFound,

    /// The invitation was already accepted.
    #[error("invitation already used")]
    InvitationUsed,

    /// The invitation has expired.
    #[error("invitation expired")]
    InvitationExpired,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing failure.
    #[error("password hashing failed")]
    PasswordHash,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized,
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::InvitationNotFound => Self::NotFound("Invitation".to_string()),
            AuthError::InvitationUsed => {
                Self::Validation("Invitation has already been used".to_string())
            }
            AuthError::InvitationExpired => Self::Gone("Invitation has expired".to_string()),
            AuthError::Repository(e) => e.into(),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_string()),
        }
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a user by accepting an invitation token.
    ///
    /// Creating the account and consuming the invitation happen in one
    /// transaction; a token can never be spent without its user existing.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvitationNotFound`, `InvitationUsed`, or
    /// `InvitationExpired` for unusable tokens, and `WeakPassword` if the
    /// password fails validation.
    pub async fn register_with_invitation(
        &self,
        token: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let invitation = InvitationRepository::new(self.pool)
            .find_by_token(token)
            .await?
            .ok_or(AuthError::InvitationNotFound)?;

        if invitation.is_accepted() {
            return Err(AuthError::InvitationUsed);
        }
        if invitation.is_expired() {
            return Err(AuthError::InvitationExpired);
        }

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let user = UserRepository::create_in_tx(
            &mut *tx,
            &invitation.email,
            &invitation.name,
            &password_hash,
            invitation.role,
        )
        .await?;

        InvitationRepository::mark_accepted_in_tx(&mut *tx, invitation.id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(user)
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for unknown emails and wrong
    /// passwords alike; callers cannot distinguish the two.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let UserCredentials {
            user,
            password_hash,
        } = UserRepository::new(self.pool)
            .find_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn short_password_rejected() {
        assert!(matches!(
            validate_password("1234567"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn malformed_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
