//! Role and status enums for console entities.

use serde::{Deserialize, Serialize};

/// Console user role.
///
/// Admins manage GPT definitions, team members, and invitations; users get
/// the chat surface and their own conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Chat message role within a conversation transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "chat_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// Invitation lifecycle status.
///
/// Expiry is not a status: an invitation stays `pending` past its
/// `expires_at` and is rejected reactively on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "invitation_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_display_roundtrip() {
        for role in [Role::Admin, Role::User] {
            let parsed: Role = role.to_string().parse().expect("parse role");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::Admin).expect("serialize"),
            "\"admin\""
        );
    }

    #[test]
    fn test_chat_role_serde() {
        let json = serde_json::to_string(&ChatRole::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_invitation_status_serde() {
        let json = serde_json::to_string(&InvitationStatus::Pending).expect("serialize");
        assert_eq!(json, "\"pending\"");
    }
}
