//! Assistant (GPT) CRUD routes.
//!
//! Every authenticated user can browse and read assistants; creating,
//! editing, and deleting them is admin-only.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::info;

use construct_core::GptId;

use crate::db::GptRepository;
use crate::db::gpts::GptRecord;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Gpt, GptInput};
use crate::state::AppState;

/// Build the assistants router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gpts", get(list).post(create))
        .route("/gpts/{id}", get(show).put(update).delete(remove))
}

/// List all assistants.
async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Gpt>>, AppError> {
    let gpts = GptRepository::new(state.pool()).list_all().await?;
    Ok(Json(gpts))
}

/// Fetch a single assistant.
async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<GptId>,
) -> Result<Json<Gpt>, AppError> {
    let gpt = GptRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("GPT".to_string()))?;
    Ok(Json(gpt))
}

/// Create an assistant.
async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<GptInput>,
) -> Result<Json<Gpt>, AppError> {
    let mcp_schema = input.validate().map_err(AppError::Validation)?;

    let gpt = GptRepository::new(state.pool())
        .create(
            admin.id,
            GptRecord {
                name: input.name.trim(),
                description: input.description.trim(),
                model: input.model,
                instruction: input.instruction.trim(),
                web_browser: input.web_browser,
                hybrid_rag: input.hybrid_rag,
                mcp: input.mcp,
                mcp_schema,
                knowledge_base: &input.knowledge_base,
                image: input.image_or_default(),
            },
        )
        .await?;

    info!(gpt_id = %gpt.id, user_id = %admin.id, "assistant created");

    Ok(Json(gpt))
}

/// Update an assistant.
async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<GptId>,
    Json(input): Json<GptInput>,
) -> Result<Json<Gpt>, AppError> {
    let mcp_schema = input.validate().map_err(AppError::Validation)?;

    let repo = GptRepository::new(state.pool());
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("GPT".to_string()))?;

    let gpt = repo
        .update(
            id,
            GptRecord {
                name: input.name.trim(),
                description: input.description.trim(),
                model: input.model,
                instruction: input.instruction.trim(),
                web_browser: input.web_browser,
                hybrid_rag: input.hybrid_rag,
                mcp: input.mcp,
                mcp_schema,
                knowledge_base: &input.knowledge_base,
                image: input.image_or_default(),
            },
        )
        .await?;

    info!(gpt_id = %gpt.id, user_id = %admin.id, "assistant updated");

    Ok(Json(gpt))
}

/// Delete an assistant.
async fn remove(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<GptId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = GptRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("GPT".to_string()));
    }

    info!(gpt_id = %id, user_id = %admin.id, "assistant deleted");

    Ok(Json(serde_json::json!({ "message": "GPT deleted" })))
}
