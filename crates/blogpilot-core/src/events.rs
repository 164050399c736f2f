//! Client event bus.
//!
//! The `EventBroadcaster` carries everything the SDK wants a front end to
//! react to without polling: session lifecycle changes (login, logout,
//! forced expiry with a login redirect) and user-facing notifications
//! emitted by mutations. It uses tokio's broadcast channel, so any number of
//! views can subscribe and a missing subscriber never blocks the sender.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::session::Role;

/// Events beyond this limit are dropped for slow receivers.
const DEFAULT_BUFFER_SIZE: usize = 256;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    #[default]
    Default,
    Success,
    Destructive,
}

/// Transient user-visible message ("toast").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            variant: NotificationVariant::Default,
        }
    }

    pub fn success(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            variant: NotificationVariant::Success,
        }
    }

    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Session lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    LoggedIn { email: String, role: Role },
    LoggedOut,
    /// Access token refreshed after a 401.
    Refreshed,
    /// Refresh failed or was impossible; storage has been cleared and the
    /// front end should navigate to `redirect_to`.
    Expired { redirect_to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    Session(SessionEvent),
    Notification(Notification),
}

/// Broadcaster for client events.
///
/// Cheap to clone; all clones share one channel.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<ClientEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it (0 when nobody
    /// listens).
    pub fn send(&self, event: ClientEvent) -> usize {
        self.sender.send(event).unwrap_or_default()
    }

    pub fn send_session(&self, event: SessionEvent) -> usize {
        tracing::debug!(?event, "session event");
        self.send(ClientEvent::Session(event))
    }

    pub fn notify(&self, notification: Notification) -> usize {
        self.send(ClientEvent::Notification(notification))
    }

    /// Events sent before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBroadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcaster_no_subscribers() {
        let broadcaster = EventBroadcaster::new();
        assert!(!broadcaster.has_subscribers());
        let count = broadcaster.notify(Notification::info("hello", None));
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_broadcaster_send_receive() {
        let broadcaster = EventBroadcaster::new();
        let mut receiver = broadcaster.subscribe();

        broadcaster.notify(Notification::failure("로그인 실패", "비밀번호가 틀렸습니다"));

        match receiver.recv().await.unwrap() {
            ClientEvent::Notification(n) => {
                assert_eq!(n.title, "로그인 실패");
                assert_eq!(n.variant, NotificationVariant::Destructive);
            }
            other => panic!("Expected notification, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_broadcaster_multiple_subscribers() {
        let broadcaster = EventBroadcaster::new();
        let mut receiver1 = broadcaster.subscribe();
        let mut receiver2 = broadcaster.subscribe();

        let count = broadcaster.send_session(SessionEvent::Expired {
            redirect_to: "/auth".into(),
        });
        assert_eq!(count, 2);

        for receiver in [&mut receiver1, &mut receiver2] {
            let event = receiver.recv().await.unwrap();
            assert_eq!(
                event,
                ClientEvent::Session(SessionEvent::Expired {
                    redirect_to: "/auth".into()
                })
            );
        }
    }

    #[test]
    fn test_clones_share_one_channel() {
        let broadcaster = EventBroadcaster::new();
        let clone = broadcaster.clone();

        let _receiver = broadcaster.subscribe();
        assert_eq!(clone.subscriber_count(), 1);
    }
}
