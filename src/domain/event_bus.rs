//! Broadcast channel for roster events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every committed
//! roster mutation publishes a [`RosterEvent`] through the bus, and each
//! WebSocket connection holds its own receiver.

use tokio::sync::broadcast;

use super::RosterEvent;

/// Broadcast bus for [`RosterEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// Publishing never blocks and never waits on slow subscribers; each
/// receiver consumes at its own pace from the shared ring buffer.
///
/// # Overflow policy
///
/// The ring buffer is bounded. A receiver that falls more than `capacity`
/// events behind observes `RecvError::Lagged(n)` on its next `recv()` and
/// skips the `n` oldest events (drop-oldest). Subscribers created after an
/// event was published never see it; there is no replay.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RosterEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: RosterEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    ///
    /// Each WebSocket connection calls this once on connect; dropping the
    /// receiver unsubscribes it.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RosterEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
