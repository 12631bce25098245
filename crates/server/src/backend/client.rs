//! Assistant backend client.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::instrument;

use crate::config::BackendConfig;

use super::error::BackendError;
use super::types::{DocumentRef, DocumentsRequest, GptConfig, SessionCreated};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the assistant backend API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed, which only happens
    /// with a broken TLS installation.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Create a new chat session and return its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn create_session(&self) -> Result<SessionCreated, BackendError> {
        let response = self
            .inner
            .client
            .post(format!("{}/api/sessions", self.inner.base_url))
            .send()
            .await?;

        let body = Self::read_success(response).await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Push the assistant configuration into a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, config), fields(model = %config.model))]
    pub async fn set_gpt_config(
        &self,
        session_id: &str,
        config: &GptConfig,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(format!(
                "{}/api/sessions/{session_id}/gpt-config",
                self.inner.base_url
            ))
            .json(config)
            .send()
            .await?;

        Self::read_success(response).await?;
        Ok(())
    }

    /// Push documents into a session for retrieval.
    ///
    /// `doc_type` distinguishes knowledge base documents ("kb") from ad-hoc
    /// user uploads ("user").
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, documents), fields(count = documents.len(), doc_type))]
    pub async fn add_documents(
        &self,
        session_id: &str,
        documents: Vec<DocumentRef>,
        doc_type: &'static str,
    ) -> Result<(), BackendError> {
        let request = DocumentsRequest {
            documents,
            doc_type,
        };

        let response = self
            .inner
            .client
            .post(format!(
                "{}/api/sessions/{session_id}/add-documents",
                self.inner.base_url
            ))
            .json(&request)
            .send()
            .await?;

        Self::read_success(response).await?;
        Ok(())
    }

    /// Start a streamed completion and return the raw byte stream.
    ///
    /// The request body is forwarded verbatim and the response bytes are
    /// returned untouched; the console does not parse completion frames.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status before streaming starts.
    #[instrument(skip(self, body))]
    pub async fn chat_stream(
        &self,
        session_id: &str,
        body: serde_json::Value,
    ) -> Result<impl Stream<Item = Result<Bytes, reqwest::Error>> + use<>, BackendError> {
        let response = self
            .inner
            .client
            .post(format!(
                "{}/api/sessions/{session_id}/chat/stream",
                self.inner.base_url
            ))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        Ok(response.bytes_stream())
    }

    async fn read_success(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(BackendError::Status { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: "http://localhost:8000/".to_string(),
        })
    }

    #[test]
    fn base_url_is_normalized() {
        let client = client();
        assert_eq!(client.inner.base_url, "http://localhost:8000");
    }

    #[test]
    fn client_is_clone_send_sync() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<BackendClient>();
    }
}
