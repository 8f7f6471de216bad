//! Authentication event channel.
//!
//! When the server answers 401 or 403 the client publishes an event here
//! instead of touching session state itself. Session and navigation logic
//! subscribes and reacts (re-login prompt, redirect). Subscription is
//! explicit; there is no ambient global event bus.

use tokio::sync::broadcast;

use crate::observability::metrics;

/// Authentication-related signals published by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The server answered 401; the session needs (re-)authentication.
    Required,
    /// The server answered 403; the session lacks permission.
    Forbidden,
}

impl AuthEvent {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::Required => "auth_required",
            AuthEvent::Forbidden => "auth_forbidden",
        }
    }
}

/// Broadcast channel for [`AuthEvent`]s.
///
/// Publishing never blocks and succeeds even with no subscribers.
#[derive(Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    /// Create a new event channel.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: AuthEvent) {
        metrics::record_auth_event(event.as_str());
        let _ = self.tx.send(event);
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
