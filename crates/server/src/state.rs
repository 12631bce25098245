//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::BackendClient;
use crate::config::ServerConfig;
use crate::services::email::{EmailError, EmailService};
use crate::storage::Presigner;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    backend: BackendClient,
    presigner: Presigner,
    email: Option<EmailService>,
    http: reqwest::Client,
}

impl AppState {
    /// Build application state from config and an established pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured SMTP relay cannot be set up.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, EmailError> {
        let backend = BackendClient::new(config.backend());
        let presigner = Presigner::new(config.storage().clone());
        let email = match config.email() {
            Some(email_config) => Some(EmailService::new(email_config)?),
            None => None,
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                backend,
                presigner,
                email,
                http: reqwest::Client::new(),
            }),
        })
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Assistant backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Object storage presigner.
    #[must_use]
    pub fn presigner(&self) -> &Presigner {
        &self.inner.presigner
    }

    /// Email service, when SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Plain HTTP client for object storage requests.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}
