//! Reference publishers and sinks
//!
//! `InMemoryPublisher` satisfies the publisher port for tests and tooling;
//! `RecordingSink` and `TracingSink` are subscribers for observation.

use crate::{
    event::Event,
    router::{EventPublisher, Subscriber},
    Result,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

/// Publisher that records every event instead of fanning out
#[derive(Default)]
pub struct InMemoryPublisher {
    events: Mutex<Vec<Event>>,
}

impl InMemoryPublisher {
    /// Create an empty publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all published events, in publish order
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Events of one kind, in publish order
    pub fn events_of(&self, kind: crate::EventKind) -> Vec<Event> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish(&self, event: Event) -> Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Subscriber that records every delivered event
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all delivered events, in delivery order
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl Subscriber for RecordingSink {
    async fn handle(&self, event: &Event) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Subscriber that logs each event through `tracing`
#[derive(Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create the sink
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscriber for TracingSink {
    async fn handle(&self, event: &Event) -> Result<()> {
        info!(
            kind = event.kind.as_str(),
            event_id = %event.id,
            timestamp = %event.timestamp,
            payload = %event.payload,
            "event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn test_in_memory_publisher_records() {
        let publisher = InMemoryPublisher::new();
        let event = Event::new(EventKind::BlockObserved, &json!({"height": 1}), Utc::now()).unwrap();

        publisher.publish(event).await.unwrap();

        assert_eq!(publisher.events().len(), 1);
        assert_eq!(publisher.events_of(EventKind::BlockObserved).len(), 1);
        assert!(publisher.events_of(EventKind::PaymentPlanned).is_empty());

        publisher.clear();
        assert!(publisher.events().is_empty());
    }
}
