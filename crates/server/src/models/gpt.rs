//! GPT (custom assistant) domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use construct_core::{GptId, ModelId, UserId};

/// Default avatar used when no image is uploaded.
pub const DEFAULT_IMAGE: &str = "default-avatar.png";

/// Maximum number of knowledge base documents per GPT.
pub const MAX_KNOWLEDGE_DOCS: usize = 10;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 50;
const DESCRIPTION_MIN: usize = 10;
const DESCRIPTION_MAX: usize = 300;
const INSTRUCTION_MIN: usize = 20;
const INSTRUCTION_MAX: usize = 80_000;

/// A configured custom assistant (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gpt {
    /// Unique identifier.
    pub id: GptId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Short description shown in listings.
    pub description: String,
    /// The language model this assistant runs on.
    pub model: ModelId,
    /// System instructions.
    pub instruction: String,
    /// Whether web browsing is enabled.
    pub web_browser: bool,
    /// Whether hybrid retrieval is enabled.
    pub hybrid_rag: bool,
    /// Whether MCP tool calling is enabled.
    pub mcp: bool,
    /// MCP tool schema (present when `mcp` is true).
    pub mcp_schema: Option<serde_json::Value>,
    /// Public URLs of uploaded knowledge base documents.
    pub knowledge_base: Vec<String>,
    /// Avatar image URL or the default placeholder.
    pub image: String,
    /// When this assistant was created.
    pub created_at: DateTime<Utc>,
    /// When this assistant was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or updating an assistant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GptInput {
    pub name: String,
    pub description: String,
    pub model: ModelId,
    pub instruction: String,
    #[serde(default)]
    pub web_browser: bool,
    #[serde(default)]
    pub hybrid_rag: bool,
    #[serde(default)]
    pub mcp: bool,
    /// Raw MCP schema JSON, validated during [`GptInput::validate`].
    pub mcp_schema: Option<String>,
    #[serde(default)]
    pub knowledge_base: Vec<String>,
    pub image: Option<String>,
}

impl GptInput {
    /// Validate field constraints and parse the MCP schema.
    ///
    /// Returns the parsed MCP schema on success (None when MCP is disabled).
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first constraint violated.
    pub fn validate(&self) -> Result<Option<serde_json::Value>, String> {
        let name_len = self.name.trim().chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&name_len) {
            return Err(format!(
                "Name must be between {NAME_MIN} and {NAME_MAX} characters"
            ));
        }

        let desc_len = self.description.trim().chars().count();
        if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&desc_len) {
            return Err(format!(
                "Description must be between {DESCRIPTION_MIN} and {DESCRIPTION_MAX} characters"
            ));
        }

        let instruction_len = self.instruction.trim().chars().count();
        if !(INSTRUCTION_MIN..=INSTRUCTION_MAX).contains(&instruction_len) {
            return Err(format!(
                "Instructions must be between {INSTRUCTION_MIN} and {INSTRUCTION_MAX} characters"
            ));
        }

        if self.knowledge_base.len() > MAX_KNOWLEDGE_DOCS {
            return Err(format!(
                "At most {MAX_KNOWLEDGE_DOCS} knowledge base documents are allowed"
            ));
        }

        if self.mcp {
            let Some(raw) = self.mcp_schema.as_deref() else {
                return Err("MCP schema is required when MCP is enabled".to_string());
            };
            let parsed: serde_json::Value = serde_json::from_str(raw)
                .map_err(|_| "MCP schema must be valid JSON".to_string())?;
            return Ok(Some(parsed));
        }

        Ok(None)
    }

    /// Returns the avatar image, falling back to the default placeholder.
    #[must_use]
    pub fn image_or_default(&self) -> String {
        self.image
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| DEFAULT_IMAGE.to_string(), ToString::to_string)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use construct_core::ModelId;

    fn valid_input() -> GptInput {
        GptInput {
            name: "Support Bot".to_string(),
            description: "Answers customer support questions".to_string(),
            model: ModelId::Gpt4oMini,
            instruction: "You are a helpful support assistant for Acme.".to_string(),
            web_browser: false,
            hybrid_rag: false,
            mcp: false,
            mcp_schema: None,
            knowledge_base: vec![],
            image: None,
        }
    }

    #[test]
    fn accepts_valid_input() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn rejects_short_name() {
        let mut input = valid_input();
        input.name = "ab".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_long_description() {
        let mut input = valid_input();
        input.description = "x".repeat(301);
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_short_instruction() {
        let mut input = valid_input();
        input.instruction = "too short".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_too_many_documents() {
        let mut input = valid_input();
        input.knowledge_base = (0..11).map(|i| format!("https://files/doc{i}.pdf")).collect();
        assert!(input.validate().is_err());
    }

    #[test]
    fn mcp_requires_schema() {
        let mut input = valid_input();
        input.mcp = true;
        assert!(input.validate().is_err());

        input.mcp_schema = Some("not json {".to_string());
        assert!(input.validate().is_err());

        input.mcp_schema = Some(r#"{"tools": []}"#.to_string());
        let parsed = input.validate().unwrap();
        assert!(parsed.is_some());
    }

    #[test]
    fn image_falls_back_to_default() {
        let mut input = valid_input();
        assert_eq!(input.image_or_default(), DEFAULT_IMAGE);

        input.image = Some("  ".to_string());
        assert_eq!(input.image_or_default(), DEFAULT_IMAGE);

        input.image = Some("https://files/avatar.png".to_string());
        assert_eq!(input.image_or_default(), "https://files/avatar.png");
    }
}
