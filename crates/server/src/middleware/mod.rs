//! HTTP middleware for the console.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth};
pub use session::create_session_layer;
