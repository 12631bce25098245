//! Business logic services.

pub mod auth;
pub mod chat_session;
pub mod email;
pub mod invites;

pub use auth::{AuthError, AuthService};
pub use chat_session::{ChatSessionService, SessionSetup};
pub use email::EmailService;
pub use invites::InviteService;
