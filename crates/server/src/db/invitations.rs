//! Invitation repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use construct_core::{Email, InvitationId, InvitationStatus, Role};

use super::{RepositoryError, is_unique_violation};
use crate::models::Invitation;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct InvitationRow {
    id: i32,
    email: String,
    name: String,
    role: Role,
    message: Option<String>,
    token: String,
    status: InvitationStatus,
    expires_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvitationRow> for Invitation {
    type Error = RepositoryError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: InvitationId::new(row.id),
            email,
            name: row.name,
            role: row.role,
            message: row.message,
            token: row.token,
            status: row.status,
            expires_at: row.expires_at,
            accepted_at: row.accepted_at,
            created_at: row.created_at,
        })
    }
}

const INVITATION_COLUMNS: &str =
    "id, email, name, role, message, token, status, expires_at, accepted_at, created_at";

/// Repository for invitation database operations.
pub struct InvitationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InvitationRepository<'a> {
    /// Create a new invitation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an invitation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a live (pending, unexpired)
    /// invitation already exists for the email.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: Role,
        message: Option<&str>,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Invitation, RepositoryError> {
        // An expired pending invitation no longer counts; clear it so the
        // partial unique index only guards live ones.
        sqlx::query(
            "DELETE FROM invitation
             WHERE email = $1 AND status = 'pending' AND expires_at <= NOW()",
        )
        .bind(email.as_str())
        .execute(self.pool)
        .await?;

        let row = sqlx::query_as::<_, InvitationRow>(&format!(
            "INSERT INTO invitation (email, name, role, message, token, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(role)
        .bind(message)
        .bind(token)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "invitation_pending_email_key") {
                RepositoryError::Conflict(
                    "An invitation for this email is already pending".to_string(),
                )
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.try_into()
    }

    /// List all invitations, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Invitation>, RepositoryError> {
        let rows = sqlx::query_as::<_, InvitationRow>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitation ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Look up an invitation by its token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, RepositoryError> {
        let row = sqlx::query_as::<_, InvitationRow>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitation WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Count invitations that are still pending and unexpired.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_pending(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invitation WHERE status = 'pending' AND expires_at > NOW()",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Mark an invitation accepted, inside an open transaction.
    ///
    /// The guard on status means a concurrent accept of the same token loses
    /// and sees zero rows updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the invitation was no longer
    /// pending.
    pub async fn mark_accepted_in_tx(
        conn: &mut PgConnection,
        id: InvitationId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE invitation
             SET status = 'accepted', accepted_at = NOW()
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(
                "Invitation has already been used".to_string(),
            ));
        }
        Ok(())
    }
}
