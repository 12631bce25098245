//! Conversation repository for database operations.
//!
//! Conversations are keyed by the backend session ID. Saving a session that
//! already exists replaces its stored messages so the transcript always
//! reflects the latest client state.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use construct_core::{ChatRole, ConversationId, GptId, MessageId, UserId};

use super::RepositoryError;
use crate::models::{Conversation, Message};

/// A message to be stored when saving a conversation.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: i32,
    user_id: i32,
    gpt_id: i32,
    session_id: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Self {
            id: ConversationId::new(row.id),
            user_id: UserId::new(row.user_id),
            gpt_id: GptId::new(row.gpt_id),
            session_id: row.session_id,
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i32,
    conversation_id: i32,
    role: ChatRole,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: MessageId::new(row.id),
            conversation_id: ConversationId::new(row.conversation_id),
            role: row.role,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

const CONVERSATION_COLUMNS: &str =
    "id, user_id, gpt_id, session_id, title, created_at, updated_at";

/// Repository for conversation database operations.
pub struct ConversationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ConversationRepository<'a> {
    /// Create a new conversation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Save a conversation by backend session ID.
    ///
    /// Inserts on first save; on subsequent saves for the same session the
    /// title is refreshed and the stored messages are replaced wholesale.
    /// Runs in a transaction so readers never observe a half-written
    /// transcript.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        gpt_id: GptId,
        session_id: &str,
        title: &str,
        messages: &[NewMessage],
    ) -> Result<Conversation, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ConversationRow>(&format!(
            "INSERT INTO conversation (user_id, gpt_id, session_id, title)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (session_id)
             DO UPDATE SET title = EXCLUDED.title, updated_at = NOW()
             WHERE conversation.user_id = EXCLUDED.user_id
             RETURNING {CONVERSATION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(gpt_id)
        .bind(session_id)
        .bind(title)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            RepositoryError::Conflict("This session belongs to another user".to_string())
        })?;

        sqlx::query("DELETE FROM message WHERE conversation_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        for message in messages {
            sqlx::query("INSERT INTO message (conversation_id, role, content) VALUES ($1, $2, $3)")
                .bind(row.id)
                .bind(message.role)
                .bind(&message.content)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }

    /// List a user's conversations, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query_as::<_, ConversationRow>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversation
             WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List every conversation, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query_as::<_, ConversationRow>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversation ORDER BY updated_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Find a conversation by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query_as::<_, ConversationRow>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversation WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Fetch the messages of a conversation in chronological order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn messages(&self, id: ConversationId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT id, conversation_id, role, content, created_at
             FROM message WHERE conversation_id = $1 ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete a conversation owned by the given user.
    ///
    /// Returns true if a row was removed. Scoping the delete by owner means
    /// one user cannot remove another's history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_for_user(
        &self,
        id: ConversationId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversation WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a conversation regardless of owner (admin path).
    ///
    /// Returns true if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversation WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all conversations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversation")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
