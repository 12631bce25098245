//! Session-stored authentication state.

use serde::{Deserialize, Serialize};

use construct_core::{Email, Role, UserId};

use super::User;

/// Minimal identity stored in the session for the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The user's database ID.
    pub id: UserId,
    /// The user's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role for authorization.
    pub role: Role,
}

impl CurrentUser {
    /// Returns true if this user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
