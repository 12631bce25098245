//! Chat session orchestration.
//!
//! Starting a chat against an assistant is a three-step handshake with the
//! backend: create a session, push the assistant configuration, then push
//! any knowledge base documents. Only session creation is fatal; the later
//! steps degrade the session (no config, no retrieval) rather than block
//! it, and the outcome of each is reported so the client can tell a fully
//! prepared session from a degraded one.

use tracing::warn;

use serde::Serialize;

use crate::backend::{BackendClient, BackendError, DocumentRef, GptConfig};
use crate::models::Gpt;

/// Outcome of preparing a chat session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSetup {
    /// Backend session identifier.
    pub session_id: String,
    /// Whether hybrid retrieval is enabled for this assistant.
    pub hybrid_rag: bool,
    /// Whether the assistant configuration reached the backend.
    pub config_pushed: bool,
    /// Whether knowledge base documents reached the backend. True when the
    /// assistant has no documents.
    pub knowledge_base_pushed: bool,
    /// The configuration that was (or failed to be) pushed, so the client
    /// can re-send it without refetching the assistant.
    pub config: GptConfig,
}

/// Orchestrates session setup against the assistant backend.
pub struct ChatSessionService<'a> {
    backend: &'a BackendClient,
}

impl<'a> ChatSessionService<'a> {
    #[must_use]
    pub const fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Create a backend session and prepare it for the given assistant.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` only when the session itself cannot be
    /// created. Configuration and document pushes are reported through the
    /// returned [`SessionSetup`] flags instead.
    pub async fn start_for_gpt(&self, gpt: &Gpt) -> Result<SessionSetup, BackendError> {
        let session = self.backend.create_session().await?;
        let session_id = session.session_id;

        let config = GptConfig::from(gpt);
        let config_pushed = match self.backend.set_gpt_config(&session_id, &config).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, session_id, gpt_id = %gpt.id, "failed to push assistant config");
                false
            }
        };

        let knowledge_base_pushed = if gpt.knowledge_base.is_empty() {
            true
        } else {
            let documents: Vec<DocumentRef> = gpt
                .knowledge_base
                .iter()
                .enumerate()
                .map(|(i, url)| DocumentRef::from_url(i, url))
                .collect();

            match self.backend.add_documents(&session_id, documents, "kb").await {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        error = %e,
                        session_id,
                        gpt_id = %gpt.id,
                        "failed to push knowledge base documents"
                    );
                    false
                }
            }
        };

        Ok(SessionSetup {
            session_id,
            hybrid_rag: gpt.hybrid_rag,
            config_pushed,
            knowledge_base_pushed,
            config,
        })
    }

    /// Attach an ad-hoc user upload to an existing session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the document.
    pub async fn add_user_document(
        &self,
        session_id: &str,
        file_url: &str,
        filename: &str,
    ) -> Result<(), BackendError> {
        let document = DocumentRef {
            id: chrono::Utc::now().timestamp_millis().to_string(),
            filename: filename.to_string(),
            file_url: file_url.to_string(),
            file_type: "application/pdf".to_string(),
            size: 0,
        };

        self.backend
            .add_documents(session_id, vec![document], "user")
            .await
    }
}
