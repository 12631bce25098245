//! Construct server library.
//!
//! A management console for custom assistants ("GPTs"): session-based
//! authentication, assistant and conversation CRUD, invite-only
//! registration, presigned object storage uploads, and a streaming relay
//! to the assistant backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
