//! Event router with per-subscriber failure isolation
//!
//! Delivery model: `publish` hands the event to every subscriber registered
//! for its kind, then to every all-events subscriber, exactly once per
//! subscription per publish call. Delivery order between subscribers is
//! unspecified. A subscriber failure is caught, counted, and logged; it
//! never prevents delivery to the remaining subscribers and never fails the
//! publish.

use crate::{
    event::{Event, EventKind},
    metrics::{EVENT_DELIVERY_DURATION, EVENT_PUBLISH_TOTAL, SUBSCRIBER_FAILURE_TOTAL},
    Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::warn;

/// Event publisher port.
///
/// State transitions publish through this trait; the router is the in-process
/// implementation, and tests use [`crate::sinks::InMemoryPublisher`].
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event
    async fn publish(&self, event: Event) -> Result<()>;
}

/// Event subscriber
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Handle a delivered event
    async fn handle(&self, event: &Event) -> Result<()>;
}

/// Handle for removing a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry {
    id: SubscriptionId,
    subscriber: Arc<dyn Subscriber>,
}

#[derive(Default)]
struct Registry {
    by_kind: HashMap<EventKind, Vec<Entry>>,
    all_events: Vec<Entry>,
}

/// In-process event router
pub struct EventRouter {
    registry: RwLock<Registry>,
    next_id: AtomicU64,
}

impl EventRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Subscribe to a single event kind
    pub async fn subscribe(
        &self,
        kind: EventKind,
        subscriber: Arc<dyn Subscriber>,
    ) -> SubscriptionId {
        let id = self.allocate_id();
        let mut registry = self.registry.write().await;
        registry
            .by_kind
            .entry(kind)
            .or_default()
            .push(Entry { id, subscriber });
        id
    }

    /// Subscribe to every event kind
    pub async fn subscribe_all(&self, subscriber: Arc<dyn Subscriber>) -> SubscriptionId {
        let id = self.allocate_id();
        let mut registry = self.registry.write().await;
        registry.all_events.push(Entry { id, subscriber });
        id
    }

    /// Remove a subscription; returns whether it existed
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write().await;

        for entries in registry.by_kind.values_mut() {
            if let Some(pos) = entries.iter().position(|e| e.id == id) {
                entries.remove(pos);
                return true;
            }
        }

        if let Some(pos) = registry.all_events.iter().position(|e| e.id == id) {
            registry.all_events.remove(pos);
            return true;
        }

        false
    }

    /// Number of live subscriptions (kind-scoped plus all-events)
    pub async fn subscription_count(&self) -> usize {
        let registry = self.registry.read().await;
        registry.by_kind.values().map(Vec::len).sum::<usize>() + registry.all_events.len()
    }

    async fn snapshot(&self, kind: EventKind) -> Vec<Arc<dyn Subscriber>> {
        let registry = self.registry.read().await;
        let mut targets: Vec<Arc<dyn Subscriber>> = Vec::new();

        if let Some(entries) = registry.by_kind.get(&kind) {
            targets.extend(entries.iter().map(|e| e.subscriber.clone()));
        }
        targets.extend(registry.all_events.iter().map(|e| e.subscriber.clone()));

        targets
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for EventRouter {
    async fn publish(&self, event: Event) -> Result<()> {
        let start = Instant::now();
        let kind = event.kind;

        // Snapshot under the read lock, deliver outside it: a slow or
        // re-subscribing handler must not hold up registration.
        let targets = self.snapshot(kind).await;

        for subscriber in targets {
            if let Err(e) = subscriber.handle(&event).await {
                SUBSCRIBER_FAILURE_TOTAL
                    .with_label_values(&[kind.as_str()])
                    .inc();
                warn!("Subscriber failed handling {}: {}", kind, e);
            }
        }

        EVENT_PUBLISH_TOTAL.with_label_values(&[kind.as_str()]).inc();
        EVENT_DELIVERY_DURATION
            .with_label_values(&[kind.as_str()])
            .observe(start.elapsed().as_secs_f64());

        Ok(())
    }
}
