//! Core types for Construct.
//!
//! Type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod model;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use model::{ModelId, UnknownModel};
pub use status::*;
