//! Event fan-out: the state-changed and notification channels.

use garage_core::Notification;
use tokio::sync::broadcast;

/// Payload of the state-changed channel. It deliberately carries
/// nothing; subscribers re-query whatever views they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent;

const CHANNEL_CAPACITY: usize = 1024;

/// Two independent broadcast channels used by the coordinator to
/// announce updates without knowing its consumers.
///
/// Receivers are the unsubscribe handles: dropping one deregisters
/// that subscriber and nobody else. A subscriber registered after a
/// publish never sees it, and a slow or failing subscriber cannot
/// block delivery to the rest.
#[derive(Debug, Clone)]
pub struct EventBus {
    changes: broadcast::Sender<ChangeEvent>,
    notifications: broadcast::Sender<Notification>,
}

impl EventBus {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (notifications, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            changes,
            notifications,
        }
    }

    /// Subscribe to state-changed events.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Subscribe to notifications.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Announce that the job/bay state changed. A publish with no
    /// subscribers is a no-op.
    pub fn publish_change(&self) {
        let _ = self.changes.send(ChangeEvent);
    }

    /// Deliver a notification to current subscribers.
    pub fn notify(&self, notification: Notification) {
        tracing::debug!(message = %notification.message, "notification");
        let _ = self.notifications.send(notification);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
