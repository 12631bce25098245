//! Construct Core - Shared types library.
//!
//! This crate provides common types used across all Construct components:
//! - `server` - The GPT console web application
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and the
//!   model catalogue

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
