//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use construct_core::{Email, Role, UserId};

/// A console user (domain type).
///
/// The password hash never leaves the database layer; this type is safe to
/// serialize into API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// The user's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role for authorization.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
