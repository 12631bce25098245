//! Conversation and message domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use construct_core::{ChatRole, ConversationId, GptId, MessageId, UserId};

/// A saved chat transcript between a user and one of their assistants.
///
/// Conversations are keyed by the backend session ID; saving the same
/// session again replaces the stored messages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique identifier.
    pub id: ConversationId,
    /// The user who held the conversation.
    pub user_id: UserId,
    /// The assistant that was used.
    pub gpt_id: GptId,
    /// Backend chat session identifier (unique per conversation).
    pub session_id: String,
    /// Display title, taken from the first user message.
    pub title: String,
    /// When the conversation was first saved.
    pub created_at: DateTime<Utc>,
    /// When the conversation was last saved.
    pub updated_at: DateTime<Utc>,
}

/// A single message within a conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// Owning conversation.
    pub conversation_id: ConversationId,
    /// Who authored the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// When the message was stored.
    pub created_at: DateTime<Utc>,
}
