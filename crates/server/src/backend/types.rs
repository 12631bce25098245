//! Wire types for the assistant backend API.

use serde::{Deserialize, Serialize};

use crate::models::Gpt;

/// Response from creating a chat session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

/// Per-session assistant configuration pushed to the backend.
///
/// Field names follow the backend's camelCase convention.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GptConfig {
    /// Backend model name (e.g. "gpt-4o", never a stored token).
    pub model: String,
    pub web_browser: bool,
    pub hybrid_rag: bool,
    pub mcp: bool,
    pub instruction: String,
    pub name: String,
    pub description: String,
}

impl From<&Gpt> for GptConfig {
    fn from(gpt: &Gpt) -> Self {
        Self {
            model: gpt.model.backend_model().to_string(),
            web_browser: gpt.web_browser,
            hybrid_rag: gpt.hybrid_rag,
            mcp: gpt.mcp,
            instruction: gpt.instruction.clone(),
            name: gpt.name.clone(),
            description: gpt.description.clone(),
        }
    }
}

/// A document reference for backend ingestion.
///
/// The backend fetches the file itself from `file_url`; `file_type` and
/// `size` are hints it may override after inspecting the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub filename: String,
    pub file_url: String,
    pub file_type: String,
    pub size: u64,
}

impl DocumentRef {
    /// Reference a knowledge base document by its public URL.
    ///
    /// The filename is taken from the last URL path segment.
    #[must_use]
    pub fn from_url(index: usize, url: &str) -> Self {
        let filename = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map_or_else(|| format!("kb-doc-{index}"), ToString::to_string);
        Self {
            id: format!("kb-{index}"),
            filename,
            file_url: url.to_string(),
            file_type: "application/pdf".to_string(),
            size: 0,
        }
    }
}

/// Request body for pushing documents into a session.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentsRequest {
    pub documents: Vec<DocumentRef>,
    /// "kb" for knowledge base documents, "user" for ad-hoc uploads.
    pub doc_type: &'static str,
}
