//! Event Bus - pub/sub for registry state changes
//!
//! The EventBus uses a tokio broadcast channel to deliver events to all
//! subscribers. Registries emit, dashboards and the reply scheduler subscribe.

use tokio::sync::broadcast;
use tracing::debug;

use super::types::CareEvent;

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Central event bus
///
/// Every registry mutation emits an event to this bus. Every view that needs
/// to stay in sync subscribes.
pub struct EventBus {
    tx: broadcast::Sender<CareEvent>,
}

impl EventBus {
    /// Create a new event bus with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "EventBus::new: creating event bus");
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Create a new event bus with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// Fire-and-forget: with no subscribers the event is dropped. A lagging
    /// subscriber loses the oldest events.
    pub fn emit(&self, event: CareEvent) {
        debug!(
            event_type = event.event_type(),
            session_id = event.session_id(),
            "EventBus::emit"
        );
        // Ignore send errors (no subscribers is OK)
        let _ = self.tx.send(event);
    }

    /// Subscribe to receive events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<CareEvent> {
        debug!("EventBus::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Alert;

    #[tokio::test]
    async fn test_emit_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let alert = Alert::new("s1", "Jane", "Other urgent crisis");
        bus.emit(CareEvent::AlertRaised { alert: alert.clone() });

        match rx.recv().await.unwrap() {
            CareEvent::AlertRaised { alert: received } => assert_eq!(received.id, alert.id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(CareEvent::AlertAcknowledged {
            alert_id: "SOS-1".to_string(),
            student_id: "s1".to_string(),
        });

        assert_eq!(rx1.recv().await.unwrap().event_type(), "alert_acknowledged");
        assert_eq!(rx2.recv().await.unwrap().event_type(), "alert_acknowledged");
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.subscriber_count(), 0);
        bus.emit(CareEvent::AlertAcknowledged {
            alert_id: "SOS-1".to_string(),
            student_id: "s1".to_string(),
        });
    }
}
