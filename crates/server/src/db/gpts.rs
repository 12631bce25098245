//! GPT repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use construct_core::{GptId, ModelId, UserId};

use super::RepositoryError;
use crate::models::Gpt;

/// Validated fields for inserting or updating an assistant.
#[derive(Debug)]
pub struct GptRecord<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub model: ModelId,
    pub instruction: &'a str,
    pub web_browser: bool,
    pub hybrid_rag: bool,
    pub mcp: bool,
    pub mcp_schema: Option<serde_json::Value>,
    pub knowledge_base: &'a [String],
    pub image: String,
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct GptRow {
    id: i32,
    user_id: i32,
    name: String,
    description: String,
    model: ModelId,
    instruction: String,
    web_browser: bool,
    hybrid_rag: bool,
    mcp: bool,
    mcp_schema: Option<serde_json::Value>,
    knowledge_base: Json<Vec<String>>,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GptRow> for Gpt {
    fn from(row: GptRow) -> Self {
        Self {
            id: GptId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            description: row.description,
            model: row.model,
            instruction: row.instruction,
            web_browser: row.web_browser,
            hybrid_rag: row.hybrid_rag,
            mcp: row.mcp,
            mcp_schema: row.mcp_schema,
            knowledge_base: row.knowledge_base.0,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const GPT_COLUMNS: &str = "id, user_id, name, description, model, instruction, web_browser, \
     hybrid_rag, mcp, mcp_schema, knowledge_base, image, created_at, updated_at";

/// Repository for assistant database operations.
pub struct GptRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GptRepository<'a> {
    /// Create a new assistant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new assistant owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        record: GptRecord<'_>,
    ) -> Result<Gpt, RepositoryError> {
        let row = sqlx::query_as::<_, GptRow>(&format!(
            "INSERT INTO gpt (user_id, name, description, model, instruction, web_browser,
                              hybrid_rag, mcp, mcp_schema, knowledge_base, image)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {GPT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(record.name)
        .bind(record.description)
        .bind(record.model)
        .bind(record.instruction)
        .bind(record.web_browser)
        .bind(record.hybrid_rag)
        .bind(record.mcp)
        .bind(record.mcp_schema)
        .bind(Json(record.knowledge_base))
        .bind(record.image)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update an existing assistant. Ownership is not checked here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no assistant has the given ID.
    pub async fn update(&self, id: GptId, record: GptRecord<'_>) -> Result<Gpt, RepositoryError> {
        let row = sqlx::query_as::<_, GptRow>(&format!(
            "UPDATE gpt
             SET name = $2, description = $3, model = $4, instruction = $5, web_browser = $6,
                 hybrid_rag = $7, mcp = $8, mcp_schema = $9, knowledge_base = $10, image = $11,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {GPT_COLUMNS}"
        ))
        .bind(id)
        .bind(record.name)
        .bind(record.description)
        .bind(record.model)
        .bind(record.instruction)
        .bind(record.web_browser)
        .bind(record.hybrid_rag)
        .bind(record.mcp)
        .bind(record.mcp_schema)
        .bind(Json(record.knowledge_base))
        .bind(record.image)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into)
            .ok_or_else(|| RepositoryError::NotFound("GPT".to_string()))
    }

    /// Find an assistant by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: GptId) -> Result<Option<Gpt>, RepositoryError> {
        let row =
            sqlx::query_as::<_, GptRow>(&format!("SELECT {GPT_COLUMNS} FROM gpt WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// List every assistant, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Gpt>, RepositoryError> {
        let rows = sqlx::query_as::<_, GptRow>(&format!(
            "SELECT {GPT_COLUMNS} FROM gpt ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete an assistant. Returns true if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: GptId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM gpt WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all assistants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gpt")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
