//! Invitation issuance.

use chrono::{Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;
use tracing::warn;

use construct_core::{Email, Role};

use crate::db::{InvitationRepository, RepositoryError};
use crate::models::Invitation;
use crate::services::email::EmailService;

/// Invitations stay valid for 7 days.
const INVITATION_TTL_DAYS: i64 = 7;

/// Length of generated invitation tokens.
const TOKEN_LENGTH: usize = 48;

/// Issues invitations and dispatches the invitation email.
pub struct InviteService<'a> {
    pool: &'a PgPool,
    email: Option<&'a EmailService>,
    base_url: &'a str,
}

impl<'a> InviteService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, email: Option<&'a EmailService>, base_url: &'a str) -> Self {
        Self {
            pool,
            email,
            base_url,
        }
    }

    /// Create an invitation and send the invitation email.
    ///
    /// Mail delivery is best-effort: a created invitation is returned even
    /// when the email could not be sent, and the returned flag reports
    /// whether it was.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a pending invitation already
    /// exists for the email.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: Role,
        message: Option<&str>,
    ) -> Result<(Invitation, bool), RepositoryError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::days(INVITATION_TTL_DAYS);

        let invitation = InvitationRepository::new(self.pool)
            .create(email, name, role, message, &token, expires_at)
            .await?;

        let email_sent = match self.email {
            Some(service) => match service.send_invitation(&invitation, self.base_url).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, invitation_id = %invitation.id, "failed to send invitation email");
                    false
                }
            },
            None => false,
        };

        Ok((invitation, email_sent))
    }
}

/// Generate a random alphanumeric invitation token.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_long_and_alphanumeric() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(char::is_alphanumeric));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }
}
