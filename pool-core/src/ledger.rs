//! Liquidity ledger orchestration
//!
//! Owns the reserve and its obligations. All mutations serialize through a
//! single write lock so concurrent reservations can never both observe a
//! stale available balance and overcommit funds. Health is recomputed on
//! the before/after snapshots of the same serialized mutation, and events
//! publish only after the mutation has committed.

use crate::{
    clock::Clock,
    entropy::IdSource,
    events::{LiquidityReleased, LiquidityReserved, PoolHealthChanged, ReleaseReason},
    health,
    types::{Obligation, PoolHealth, Reserve},
    Error, Result,
};
use async_trait::async_trait;
use event_router::{Event, EventKind, EventPublisher};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Repository port for the reserve and its obligations.
///
/// `commit` persists the reserve update and the obligation upsert as one
/// unit; an implementation must not let one land without the other.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load the current reserve snapshot
    async fn load_reserve(&self) -> Result<Reserve>;

    /// Find an obligation by id
    async fn find_obligation(&self, id: Uuid) -> Result<Option<Obligation>>;

    /// All obligations still pending
    async fn pending_obligations(&self) -> Result<Vec<Obligation>>;

    /// Atomically persist a reserve update together with an obligation upsert
    async fn commit(&self, reserve: &Reserve, obligation: &Obligation) -> Result<()>;
}

/// Outcome of a reservation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ReserveOutcome {
    /// Funds earmarked; the pending obligation records the commitment
    Reserved(Obligation),

    /// Requested amount exceeds available funds; nothing changed
    InsufficientLiquidity {
        /// Amount requested
        requested: Decimal,
        /// Amount available at the time of the attempt
        available: Decimal,
    },
}

impl ReserveOutcome {
    /// The obligation, when the reservation succeeded
    pub fn obligation(&self) -> Option<&Obligation> {
        match self {
            ReserveOutcome::Reserved(obligation) => Some(obligation),
            ReserveOutcome::InsufficientLiquidity { .. } => None,
        }
    }
}

/// Liquidity ledger
pub struct LiquidityLedger {
    store: Arc<dyn LedgerStore>,
    publisher: Arc<dyn EventPublisher>,
    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl LiquidityLedger {
    /// Create a ledger over the given store and capabilities
    pub fn new(
        store: Arc<dyn LedgerStore>,
        publisher: Arc<dyn EventPublisher>,
        ids: Arc<dyn IdSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            publisher,
            ids,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Reserve `amount` against the pool.
    ///
    /// Insufficient funds are a soft failure: no state change, no event.
    pub async fn reserve(&self, amount: Decimal) -> Result<ReserveOutcome> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }

        let now = self.clock.now();
        let mut events = Vec::with_capacity(2);

        let outcome = {
            let _guard = self.write_lock.lock().await;

            let current = self.store.load_reserve().await?;
            if current.available_amount < amount {
                debug!(
                    requested = %amount,
                    available = %current.available_amount,
                    "reservation refused"
                );
                ReserveOutcome::InsufficientLiquidity {
                    requested: amount,
                    available: current.available_amount,
                }
            } else {
                let updated = current.with_reservation(amount);
                updated.validate()?;

                let obligation = Obligation::pending(self.ids.next_id(), amount, now);
                self.store.commit(&updated, &obligation).await?;

                events.push(Event::new(
                    EventKind::LiquidityReserved,
                    &LiquidityReserved {
                        obligation_id: obligation.id,
                        amount,
                    },
                    now,
                )?);
                if let Some(change) = health_transition(&current, &updated) {
                    events.push(Event::new(EventKind::PoolHealthChanged, &change, now)?);
                }

                info!(obligation_id = %obligation.id, %amount, "liquidity reserved");
                ReserveOutcome::Reserved(obligation)
            }
        };

        for event in events {
            self.publisher.publish(event).await?;
        }

        Ok(outcome)
    }

    /// Fulfill a pending obligation: the earmarked funds leave the pool.
    ///
    /// Returns false, with no side effect, when the obligation is absent or
    /// no longer pending.
    pub async fn fulfill(&self, obligation_id: Uuid) -> Result<bool> {
        self.settle(obligation_id, ReleaseReason::Fulfilled).await
    }

    /// Expire an abandoned pending obligation: the earmarked funds return
    /// to the available balance.
    pub async fn expire(&self, obligation_id: Uuid) -> Result<bool> {
        self.settle(obligation_id, ReleaseReason::Expired).await
    }

    async fn settle(&self, obligation_id: Uuid, reason: ReleaseReason) -> Result<bool> {
        let now = self.clock.now();
        let mut events = Vec::with_capacity(2);

        {
            let _guard = self.write_lock.lock().await;

            let obligation = match self.store.find_obligation(obligation_id).await? {
                Some(obligation) if !obligation.is_terminal() => obligation,
                _ => return Ok(false),
            };

            let current = self.store.load_reserve().await?;
            let (updated, terminal) = match reason {
                ReleaseReason::Fulfilled => (
                    current.with_fulfillment(obligation.amount),
                    obligation.fulfilled(),
                ),
                ReleaseReason::Expired => {
                    (current.with_release(obligation.amount), obligation.expired())
                }
            };
            updated.validate()?;

            self.store.commit(&updated, &terminal).await?;

            events.push(Event::new(
                EventKind::LiquidityReleased,
                &LiquidityReleased {
                    obligation_id,
                    amount: obligation.amount,
                    reason,
                },
                now,
            )?);
            if let Some(change) = health_transition(&current, &updated) {
                events.push(Event::new(EventKind::PoolHealthChanged, &change, now)?);
            }

            info!(%obligation_id, amount = %obligation.amount, ?reason, "liquidity released");
        }

        for event in events {
            self.publisher.publish(event).await?;
        }

        Ok(true)
    }

    /// Current pool health, with the pending obligation count filled in
    pub async fn health(&self) -> Result<PoolHealth> {
        let reserve = self.store.load_reserve().await?;
        let pending = self.store.pending_obligations().await?;

        let mut health = health::evaluate(&reserve);
        health.pending_obligations = pending.len();
        Ok(health)
    }
}

fn health_transition(previous: &Reserve, current: &Reserve) -> Option<PoolHealthChanged> {
    let before = health::evaluate(previous);
    let after = health::evaluate(current);

    (before.status != after.status).then(|| PoolHealthChanged {
        previous_status: before.status,
        new_status: after.status,
        utilization_rate: after.utilization_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        entropy::SequentialIdSource,
        store::InMemoryLedgerStore,
        types::{Currency, HealthStatus, ObligationStatus},
    };
    use chrono::Utc;
    use event_router::InMemoryPublisher;
    use rust_decimal_macros::dec;

    struct Fixture {
        ledger: LiquidityLedger,
        store: Arc<InMemoryLedgerStore>,
        publisher: Arc<InMemoryPublisher>,
    }

    fn fixture(total: Decimal) -> Fixture {
        let store = Arc::new(InMemoryLedgerStore::new(Reserve::opening(
            total,
            Currency::Btc,
        )));
        let publisher = Arc::new(InMemoryPublisher::new());
        let ledger = LiquidityLedger::new(
            store.clone(),
            publisher.clone(),
            Arc::new(SequentialIdSource::new()),
            Arc::new(ManualClock::new(Utc::now())),
        );

        Fixture {
            ledger,
            store,
            publisher,
        }
    }

    #[tokio::test]
    async fn test_reserve_moves_funds_and_stays_healthy() {
        // Scenario A
        let f = fixture(dec!(100));

        let outcome = f.ledger.reserve(dec!(30)).await.unwrap();
        let obligation = outcome.obligation().expect("reservation should succeed");
        assert_eq!(obligation.amount, dec!(30));
        assert_eq!(obligation.status, ObligationStatus::Pending);

        let reserve = f.store.load_reserve().await.unwrap();
        assert_eq!(reserve.total_amount, dec!(100));
        assert_eq!(reserve.available_amount, dec!(70));
        assert_eq!(reserve.reserved_amount, dec!(30));

        let health = f.ledger.health().await.unwrap();
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.pending_obligations, 1);

        let reserved = f.publisher.events_of(EventKind::LiquidityReserved);
        assert_eq!(reserved.len(), 1);
        let payload: LiquidityReserved = reserved[0].payload_as().unwrap();
        assert_eq!(payload.obligation_id, obligation.id);
        assert_eq!(payload.amount, dec!(30));

        // No class change, no health event.
        assert!(f
            .publisher
            .events_of(EventKind::PoolHealthChanged)
            .is_empty());
    }

    #[tokio::test]
    async fn test_deep_reservation_turns_critical() {
        // Scenario B
        let f = fixture(dec!(100));

        f.ledger.reserve(dec!(95)).await.unwrap();

        let reserve = f.store.load_reserve().await.unwrap();
        assert_eq!(reserve.available_amount, dec!(5));
        assert_eq!(reserve.reserved_amount, dec!(95));

        let changes = f.publisher.events_of(EventKind::PoolHealthChanged);
        assert_eq!(changes.len(), 1);
        let payload: PoolHealthChanged = changes[0].payload_as().unwrap();
        assert_eq!(payload.previous_status, HealthStatus::Healthy);
        assert_eq!(payload.new_status, HealthStatus::Critical);
        assert!((payload.utilization_rate - 0.95).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_insufficient_liquidity_changes_nothing() {
        let f = fixture(dec!(100));

        let outcome = f.ledger.reserve(dec!(150)).await.unwrap();
        assert_eq!(
            outcome,
            ReserveOutcome::InsufficientLiquidity {
                requested: dec!(150),
                available: dec!(100),
            }
        );

        let reserve = f.store.load_reserve().await.unwrap();
        assert_eq!(reserve, Reserve::opening(dec!(100), Currency::Btc));
        assert!(f.store.pending_obligations().await.unwrap().is_empty());
        assert!(f.publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_reserve_rejects_non_positive_amounts() {
        let f = fixture(dec!(100));

        assert!(matches!(
            f.ledger.reserve(Decimal::ZERO).await,
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            f.ledger.reserve(dec!(-5)).await,
            Err(Error::InvalidAmount(_))
        ));
        assert!(f.publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_fulfill_removes_funds_from_pool() {
        let f = fixture(dec!(100));

        let outcome = f.ledger.reserve(dec!(30)).await.unwrap();
        let obligation_id = outcome.obligation().unwrap().id;

        assert!(f.ledger.fulfill(obligation_id).await.unwrap());

        let reserve = f.store.load_reserve().await.unwrap();
        assert_eq!(reserve.total_amount, dec!(70));
        assert_eq!(reserve.available_amount, dec!(70));
        assert_eq!(reserve.reserved_amount, Decimal::ZERO);

        let obligation = f
            .store
            .find_obligation(obligation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(obligation.status, ObligationStatus::Fulfilled);

        let released = f.publisher.events_of(EventKind::LiquidityReleased);
        assert_eq!(released.len(), 1);
        let payload: LiquidityReleased = released[0].payload_as().unwrap();
        assert_eq!(payload.reason, ReleaseReason::Fulfilled);
        assert_eq!(payload.amount, dec!(30));

        // Terminal obligations cannot be fulfilled again.
        assert!(!f.ledger.fulfill(obligation_id).await.unwrap());
        assert_eq!(f.publisher.events_of(EventKind::LiquidityReleased).len(), 1);
    }

    #[tokio::test]
    async fn test_fulfill_unknown_obligation_is_soft() {
        let f = fixture(dec!(100));
        assert!(!f.ledger.fulfill(Uuid::new_v4()).await.unwrap());
        assert!(f.publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_expire_returns_funds_to_available() {
        let f = fixture(dec!(100));

        let outcome = f.ledger.reserve(dec!(40)).await.unwrap();
        let obligation_id = outcome.obligation().unwrap().id;

        assert!(f.ledger.expire(obligation_id).await.unwrap());

        let reserve = f.store.load_reserve().await.unwrap();
        assert_eq!(reserve.total_amount, dec!(100));
        assert_eq!(reserve.available_amount, dec!(100));
        assert_eq!(reserve.reserved_amount, Decimal::ZERO);

        let released = f.publisher.events_of(EventKind::LiquidityReleased);
        let payload: LiquidityReleased = released[0].payload_as().unwrap();
        assert_eq!(payload.reason, ReleaseReason::Expired);

        // Expired is terminal.
        assert!(!f.ledger.fulfill(obligation_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_health_event_only_on_class_change() {
        let f = fixture(dec!(100));

        // available .15 -> warning: one change event
        f.ledger.reserve(dec!(85)).await.unwrap();
        // available .10 -> still warning (boundaries are strict): no event
        f.ledger.reserve(dec!(5)).await.unwrap();

        let changes = f.publisher.events_of(EventKind::PoolHealthChanged);
        assert_eq!(changes.len(), 1);
        let payload: PoolHealthChanged = changes[0].payload_as().unwrap();
        assert_eq!(payload.previous_status, HealthStatus::Healthy);
        assert_eq!(payload.new_status, HealthStatus::Warning);
    }

    #[tokio::test]
    async fn test_expiry_can_recover_health() {
        let f = fixture(dec!(100));

        let outcome = f.ledger.reserve(dec!(95)).await.unwrap();
        let obligation_id = outcome.obligation().unwrap().id;
        f.ledger.expire(obligation_id).await.unwrap();

        let changes = f.publisher.events_of(EventKind::PoolHealthChanged);
        assert_eq!(changes.len(), 2);
        let recovery: PoolHealthChanged = changes[1].payload_as().unwrap();
        assert_eq!(recovery.previous_status, HealthStatus::Critical);
        assert_eq!(recovery.new_status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_pending_count_tracks_obligations() {
        let f = fixture(dec!(100));

        let first = f.ledger.reserve(dec!(10)).await.unwrap();
        f.ledger.reserve(dec!(10)).await.unwrap();
        assert_eq!(f.ledger.health().await.unwrap().pending_obligations, 2);

        f.ledger
            .fulfill(first.obligation().unwrap().id)
            .await
            .unwrap();
        assert_eq!(f.ledger.health().await.unwrap().pending_obligations, 1);
    }
}
