//! Conversation history routes.
//!
//! Clients save a transcript by backend session ID after streaming
//! completes; saving the same session again replaces the stored messages.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use construct_core::{ChatRole, ConversationId, GptId};

use crate::db::ConversationRepository;
use crate::db::conversations::NewMessage;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Conversation, Message};
use crate::state::AppState;

/// Longest title derived from a message before truncation.
const MAX_TITLE_LENGTH: usize = 80;

/// Build the conversations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(list).post(save))
        .route("/conversations/{id}", get(show).delete(remove))
        .route("/admin/conversations", get(list_all))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest {
    gpt_id: GptId,
    session_id: String,
    title: Option<String>,
    messages: Vec<NewMessage>,
}

#[derive(Debug, Serialize)]
struct ConversationWithMessages {
    #[serde(flatten)]
    conversation: Conversation,
    messages: Vec<Message>,
}

/// Save (upsert) a conversation transcript.
async fn save(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<SaveRequest>,
) -> Result<Json<Conversation>, AppError> {
    if request.session_id.trim().is_empty() {
        return Err(AppError::Validation("sessionId is required".to_string()));
    }
    if request.messages.is_empty() {
        return Err(AppError::Validation(
            "at least one message is required".to_string(),
        ));
    }

    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| derive_title(&request.messages), ToString::to_string);

    let conversation = ConversationRepository::new(state.pool())
        .upsert(
            user.id,
            request.gpt_id,
            request.session_id.trim(),
            &title,
            &request.messages,
        )
        .await?;

    Ok(Json(conversation))
}

/// List the caller's conversations.
async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = ConversationRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(conversations))
}

/// Fetch one conversation with its messages.
///
/// Users can read their own conversations; admins can read anyone's.
async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ConversationId>,
) -> Result<Json<ConversationWithMessages>, AppError> {
    let repo = ConversationRepository::new(state.pool());

    let conversation = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conversation".to_string()))?;

    if conversation.user_id != user.id && !user.is_admin() {
        return Err(AppError::NotFound("Conversation".to_string()));
    }

    let messages = repo.messages(id).await?;

    Ok(Json(ConversationWithMessages {
        conversation,
        messages,
    }))
}

/// Delete a conversation.
///
/// Users can delete their own; admins can delete anyone's.
async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ConversationId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let repo = ConversationRepository::new(state.pool());
    let deleted = if user.is_admin() {
        repo.delete(id).await?
    } else {
        repo.delete_for_user(id, user.id).await?
    };
    if !deleted {
        return Err(AppError::NotFound("Conversation".to_string()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Conversation deleted" }),
    ))
}

/// List every conversation (admin history view).
async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = ConversationRepository::new(state.pool()).list_all().await?;
    Ok(Json(conversations))
}

/// Derive a title from the first user message, truncated on a char
/// boundary.
fn derive_title(messages: &[NewMessage]) -> String {
    let source = messages
        .iter()
        .find(|m| m.role == ChatRole::User)
        .map_or("New conversation", |m| m.content.trim());

    if source.is_empty() {
        return "New conversation".to_string();
    }

    source.chars().take(MAX_TITLE_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: ChatRole, content: &str) -> NewMessage {
        NewMessage {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn title_comes_from_first_user_message() {
        let messages = vec![
            msg(ChatRole::System, "You are helpful"),
            msg(ChatRole::User, "How do I reset my password?"),
            msg(ChatRole::Assistant, "Follow these steps"),
        ];
        assert_eq!(derive_title(&messages), "How do I reset my password?");
    }

    #[test]
    fn title_truncates_long_messages() {
        let long = "x".repeat(200);
        let messages = vec![msg(ChatRole::User, &long)];
        assert_eq!(derive_title(&messages).chars().count(), MAX_TITLE_LENGTH);
    }

    #[test]
    fn title_falls_back_without_user_messages() {
        let messages = vec![msg(ChatRole::Assistant, "Hello")];
        assert_eq!(derive_title(&messages), "New conversation");
    }
}
