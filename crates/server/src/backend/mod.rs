//! HTTP client for the assistant backend.
//!
//! The backend owns chat sessions: it holds the per-session model
//! configuration, ingests documents for retrieval, and produces the
//! streamed completions. The console never interprets completion bytes;
//! it relays them verbatim.

mod client;
mod error;
mod types;

pub use client::BackendClient;
pub use error::BackendError;
pub use types::{DocumentRef, DocumentsRequest, GptConfig, SessionCreated};
