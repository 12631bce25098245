//! Domain models for the console.

pub mod conversation;
pub mod gpt;
pub mod invitation;
pub mod session;
pub mod user;

pub use conversation::{Conversation, Message};
pub use gpt::{Gpt, GptInput};
pub use invitation::Invitation;
pub use session::CurrentUser;
pub use user::User;
