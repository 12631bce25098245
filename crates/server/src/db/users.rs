//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use construct_core::{Email, Role, UserId};

use super::{RepositoryError, is_unique_violation};
use crate::models::User;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row type for login, carrying the password hash alongside the profile.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: i32,
    email: String,
    name: String,
    password_hash: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A user together with their stored password hash, for verification.
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl TryFrom<CredentialRow> for UserCredentials {
    type Error = RepositoryError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let password_hash = row.password_hash.clone();
        let user = UserRow {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
        .try_into()?;
        Ok(Self {
            user,
            password_hash,
        })
    }
}

const USER_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a user inside an open transaction.
    ///
    /// Used by invite acceptance so the user insert and the invitation
    /// update commit together.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub async fn create_in_tx(
        conn: &mut PgConnection,
        email: &Email,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO app_user (email, name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, email, name, role, created_at, updated_at",
        )
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "app_user_email_key") {
                RepositoryError::Conflict("An account with this email already exists".to_string())
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.try_into()
    }

    /// Find a user with their password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, email, name, password_hash, role, created_at, updated_at
             FROM app_user WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Returns true if an account exists for the given email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM app_user WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Update a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has the given ID, or
    /// `RepositoryError::Conflict` if the new email is already taken.
    pub async fn update_profile(
        &self,
        id: UserId,
        email: &Email,
        name: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE app_user
             SET email = $2, name = $3, role = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(email.as_str())
        .bind(name)
        .bind(role)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "app_user_email_key") {
                RepositoryError::Conflict("An account with this email already exists".to_string())
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.map(TryInto::try_into)
            .transpose()?
            .ok_or_else(|| RepositoryError::NotFound("User".to_string()))
    }

    /// Delete a user. Returns true if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Count all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_user")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
