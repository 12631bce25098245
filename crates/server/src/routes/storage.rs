//! Direct-to-storage upload routes.
//!
//! Upload issues a short-lived presigned PUT URL; the client PUTs the file
//! straight to the bucket and keeps the returned public URL. Delete is
//! executed server-side against a presigned DELETE URL so credentials
//! never reach the client.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;
use crate::storage::Presigner;

/// Build the storage router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/s3/upload", post(presign_upload))
        .route("/s3/delete", axum::routing::delete(delete_object))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest {
    file_name: String,
    file_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    upload_url: String,
    file_url: String,
    key: String,
}

#[derive(Debug, Deserialize)]
struct DeleteRequest {
    key: String,
}

/// Issue a presigned upload URL.
async fn presign_upload(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    if request.file_name.trim().is_empty() || request.file_type.trim().is_empty() {
        return Err(AppError::Validation(
            "fileName and fileType are required".to_string(),
        ));
    }

    if !Presigner::is_allowed_type(&request.file_type) {
        return Err(AppError::Validation(
            "Only images, PDFs, Word docs, Markdown, and JSON files allowed".to_string(),
        ));
    }

    let key = Presigner::object_key(request.file_name.trim());
    let upload_url = state.presigner().presign_put(&key);
    let file_url = state.presigner().public_url(&key);

    info!(user_id = %user.id, key, "presigned upload issued");

    Ok(Json(UploadResponse {
        upload_url,
        file_url,
        key,
    }))
}

/// Delete an object from storage.
async fn delete_object(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.key.trim().is_empty() {
        return Err(AppError::Validation("File key required".to_string()));
    }

    let url = state.presigner().presign_delete(request.key.trim());

    let response = state
        .http()
        .delete(url)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("storage delete failed: {e}")))?;

    if !response.status().is_success() {
        warn!(status = %response.status(), key = request.key, "storage delete rejected");
        return Err(AppError::Internal("storage delete failed".to_string()));
    }

    info!(user_id = %user.id, key = request.key, "object deleted");

    Ok(Json(
        serde_json::json!({ "message": "File deleted successfully" }),
    ))
}
