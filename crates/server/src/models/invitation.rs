//! Invitation domain types.
//!
//! Registration is invite-only: an admin issues an invitation, the recipient
//! follows the emailed link and registers against the invitation token.

use chrono::{DateTime, Utc};
use serde::Serialize;

use construct_core::{Email, InvitationId, InvitationStatus, Role};

/// An invitation record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// Unique identifier.
    pub id: InvitationId,
    /// Email address the invitation was sent to.
    pub email: Email,
    /// Display name for the invited user.
    pub name: String,
    /// Role to assign on acceptance.
    pub role: Role,
    /// Optional personal note included in the email.
    pub message: Option<String>,
    /// Opaque token embedded in the invitation link.
    pub token: String,
    /// Current lifecycle state.
    pub status: InvitationStatus,
    /// When the invitation stops being usable.
    pub expires_at: DateTime<Utc>,
    /// When the invitation was accepted (None while pending).
    pub accepted_at: Option<DateTime<Utc>>,
    /// When the invitation was created.
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Returns true if this invitation has already been accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == InvitationStatus::Accepted
    }

    /// Returns true if this invitation has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Returns true if this invitation can still be accepted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_accepted() && !self.is_expired()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(status: InvitationStatus, expires_at: DateTime<Utc>) -> Invitation {
        Invitation {
            id: InvitationId::new(1),
            email: Email::parse("invited@example.com").unwrap(),
            name: "Invited User".to_string(),
            role: Role::User,
            message: None,
            token: "tok_abc123".to_string(),
            status,
            expires_at,
            accepted_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pending_unexpired_is_valid() {
        let inv = invitation(InvitationStatus::Pending, Utc::now() + Duration::days(7));
        assert!(inv.is_valid());
    }

    #[test]
    fn accepted_is_not_valid() {
        let inv = invitation(InvitationStatus::Accepted, Utc::now() + Duration::days(7));
        assert!(!inv.is_valid());
    }

    #[test]
    fn expired_is_not_valid() {
        let inv = invitation(InvitationStatus::Pending, Utc::now() - Duration::hours(1));
        assert!(inv.is_expired());
        assert!(!inv.is_valid());
    }
}
