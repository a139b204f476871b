//! Ephemeral notifications fanned out to subscribers.
//!
//! Notifications are created as a side effect of commands and
//! delivered to whoever is subscribed at that moment; they are never
//! persisted. Display expiry is the consumer's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Role of a user in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Manager,
    Leader,
    Customer,
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A fan-out message. With neither recipient field set it is a
/// broadcast to everyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_user_id: Option<String>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            message: message.into(),
            kind,
            timestamp: Utc::now(),
            recipient_role: None,
            recipient_user_id: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    /// Address the notification to everyone holding a role.
    pub fn for_role(mut self, role: UserRole) -> Self {
        self.recipient_role = Some(role);
        self
    }

    /// Address the notification to one user.
    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.recipient_user_id = Some(user_id.into());
        self
    }

    pub fn is_broadcast(&self) -> bool {
        self.recipient_role.is_none() && self.recipient_user_id.is_none()
    }

    /// Whether a viewer with the given role and user id should see
    /// this notification.
    pub fn is_addressed_to(&self, role: UserRole, user_id: &str) -> bool {
        if self.is_broadcast() {
            return true;
        }
        if self.recipient_role == Some(role) {
            return true;
        }
        self.recipient_user_id.as_deref() == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untargeted_notification_is_broadcast() {
        let n = Notification::info("shop opens late today");
        assert!(n.is_broadcast());
        assert!(n.is_addressed_to(UserRole::Customer, "u-77"));
        assert!(n.is_addressed_to(UserRole::Manager, "u-1"));
    }

    #[test]
    fn role_targeting_excludes_other_roles() {
        let n = Notification::warning("bay 2 delayed").for_role(UserRole::Manager);
        assert!(n.is_addressed_to(UserRole::Manager, "u-1"));
        assert!(!n.is_addressed_to(UserRole::Customer, "u-77"));
    }

    #[test]
    fn user_targeting_matches_exact_id() {
        let n = Notification::info("car ready").for_user("u-77");
        assert!(n.is_addressed_to(UserRole::Customer, "u-77"));
        assert!(!n.is_addressed_to(UserRole::Customer, "u-78"));
    }
}
