//! Chat session and streaming routes.
//!
//! The streaming endpoint is a byte relay: the request body (minus the
//! session ID) is forwarded to the backend and the response bytes are
//! passed through untouched, so the wire format stays whatever the
//! backend emits.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
    routing::post,
};
use serde::Deserialize;
use tracing::{error, info};

use construct_core::GptId;

use crate::db::GptRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::{ChatSessionService, SessionSetup};
use crate::state::AppState;

/// Build the chat router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{session_id}/documents", post(add_document))
        .route("/chat/stream", post(stream))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    gpt_id: GptId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddDocumentRequest {
    file_url: String,
    filename: String,
}

/// Create a backend session prepared for the given assistant.
async fn create_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionSetup>, AppError> {
    let gpt = GptRepository::new(state.pool())
        .find_by_id(request.gpt_id)
        .await?
        .ok_or_else(|| AppError::NotFound("GPT".to_string()))?;

    let setup = ChatSessionService::new(state.backend())
        .start_for_gpt(&gpt)
        .await?;

    info!(
        user_id = %user.id,
        gpt_id = %gpt.id,
        session_id = setup.session_id,
        config_pushed = setup.config_pushed,
        knowledge_base_pushed = setup.knowledge_base_pushed,
        "chat session prepared"
    );

    Ok(Json(setup))
}

/// Attach a user-uploaded document to a session.
async fn add_document(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(session_id): Path<String>,
    Json(request): Json<AddDocumentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.file_url.trim().is_empty() || request.filename.trim().is_empty() {
        return Err(AppError::Validation(
            "fileUrl and filename are required".to_string(),
        ));
    }

    ChatSessionService::new(state.backend())
        .add_user_document(&session_id, request.file_url.trim(), request.filename.trim())
        .await?;

    Ok(Json(serde_json::json!({ "message": "Document added" })))
}

/// Relay a streamed completion from the backend.
///
/// The body must carry a non-empty `sessionId`; everything else is
/// forwarded verbatim.
async fn stream(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(mut body): Json<serde_json::Value>,
) -> Result<Response, AppError> {
    let session_id = body
        .as_object_mut()
        .and_then(|map| map.remove("sessionId"))
        .and_then(|v| v.as_str().map(ToString::to_string))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Session ID is required".to_string()))?;

    let byte_stream = state
        .backend()
        .chat_stream(&session_id, body)
        .await
        .map_err(|e| stream_start_error(&session_id, &e))?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .header(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))
        .header(header::CONNECTION, HeaderValue::from_static("keep-alive"))
        .header(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        )
        .header(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        )
        .body(Body::from_stream(byte_stream))
        .map_err(|e| AppError::Internal(format!("failed to build stream response: {e}")))?;

    Ok(response)
}

// The stream route answers 500 on a backend failure, unlike the session
// setup routes which report the upstream as a 502.
fn stream_start_error(session_id: &str, err: &crate::backend::BackendError) -> AppError {
    error!(error = %err, session_id, "backend stream failed to start");
    AppError::Internal(format!("backend stream failed to start: {err}"))
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;
    use crate::backend::BackendError;

    #[test]
    fn stream_backend_failure_maps_to_500() {
        let err = BackendError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "upstream restarting".to_string(),
        };
        let response = stream_start_error("sess-1", &err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
