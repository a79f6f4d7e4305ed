//! Chain observation use cases

use crate::{
    events::{BlockObserved, FeeEstimateUpdated, TransactionConfirmed},
    types::{Confirmation, FeeEstimates, FeePriority, TxId},
    Result,
};
use async_trait::async_trait;
use event_router::{Event, EventKind, EventPublisher};
use pool_core::Clock;
use std::sync::Arc;
use tracing::debug;

/// Confirmation depth treated as final
pub const DEFAULT_REQUIRED_CONFIRMATIONS: u32 = 6;

/// Read-only blockchain collaborator.
///
/// Exposes scalar values only; the feed never sees raw chain data.
#[async_trait]
pub trait BlockchainDataSource: Send + Sync {
    /// Current chain tip height
    async fn current_height(&self) -> Result<u64>;

    /// Confirmation view of a transaction, if the source knows it
    async fn transaction(&self, tx_id: &TxId) -> Result<Option<crate::types::TxInfo>>;

    /// Tiered fee estimates
    async fn fee_estimates(&self) -> Result<FeeEstimates>;
}

/// Normalizing chain feed
pub struct ChainFeed {
    source: Arc<dyn BlockchainDataSource>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    required_confirmations: u32,
}

impl ChainFeed {
    /// Create a feed requiring the default confirmation depth
    pub fn new(
        source: Arc<dyn BlockchainDataSource>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            publisher,
            clock,
            required_confirmations: DEFAULT_REQUIRED_CONFIRMATIONS,
        }
    }

    /// Override the required confirmation depth
    pub fn with_required_confirmations(mut self, depth: u32) -> Self {
        self.required_confirmations = depth;
        self
    }

    /// Normalize a raw block observation into a `BLOCK_OBSERVED` event
    pub async fn observe_block(&self, height: u64, transaction_count: u32) -> Result<()> {
        let now = self.clock.now();

        self.publisher
            .publish(Event::new(
                EventKind::BlockObserved,
                &BlockObserved {
                    height,
                    transaction_count,
                },
                now,
            )?)
            .await?;

        debug!(height, transaction_count, "block observed");
        Ok(())
    }

    /// Check a transaction's confirmation depth and publish the result.
    ///
    /// Unknown transactions yield `None` and no event.
    pub async fn check_confirmation(&self, tx_id: &TxId) -> Result<Option<Confirmation>> {
        let now = self.clock.now();

        let Some(info) = self.source.transaction(tx_id).await? else {
            return Ok(None);
        };

        let confirmation = Confirmation {
            count: info.confirmations,
            is_confirmed: info.confirmations >= self.required_confirmations,
        };

        self.publisher
            .publish(Event::new(
                EventKind::TransactionConfirmed,
                &TransactionConfirmed {
                    tx_id: tx_id.as_str().to_string(),
                    confirmations: confirmation.count,
                    is_confirmed: confirmation.is_confirmed,
                },
                now,
            )?)
            .await?;

        Ok(Some(confirmation))
    }

    /// Refresh fee estimates, publishing one event per priority tier
    pub async fn refresh_fee_estimates(&self) -> Result<FeeEstimates> {
        let now = self.clock.now();
        let fees = self.source.fee_estimates().await?;

        for priority in FeePriority::all() {
            self.publisher
                .publish(Event::new(
                    EventKind::FeeEstimateUpdated,
                    &FeeEstimateUpdated {
                        sat_per_vbyte: fees.tier(priority),
                        priority,
                    },
                    now,
                )?)
                .await?;
        }

        Ok(fees)
    }

    /// Current chain tip height, straight from the data source
    pub async fn current_height(&self) -> Result<u64> {
        self.source.current_height().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDataSource;
    use event_router::InMemoryPublisher;
    use pool_core::{ManualClock, SystemClock};

    fn feed(source: Arc<MockDataSource>) -> (ChainFeed, Arc<InMemoryPublisher>) {
        let publisher = Arc::new(InMemoryPublisher::new());
        let feed = ChainFeed::new(source, publisher.clone(), Arc::new(SystemClock));
        (feed, publisher)
    }

    #[tokio::test]
    async fn test_observe_block_publishes() {
        let source = Arc::new(MockDataSource::new());
        let (feed, publisher) = feed(source);

        feed.observe_block(840_000, 3_021).await.unwrap();

        let observed = publisher.events_of(EventKind::BlockObserved);
        assert_eq!(observed.len(), 1);
        let payload: BlockObserved = observed[0].payload_as().unwrap();
        assert_eq!(payload.height, 840_000);
        assert_eq!(payload.transaction_count, 3_021);
    }

    #[tokio::test]
    async fn test_confirmation_depth_threshold() {
        let source = Arc::new(MockDataSource::new());
        let tx = TxId::new("aa11");
        source.set_confirmations(&tx, 5);
        let (feed, publisher) = feed(source.clone());

        let confirmation = feed.check_confirmation(&tx).await.unwrap().unwrap();
        assert_eq!(confirmation.count, 5);
        assert!(!confirmation.is_confirmed);

        source.set_confirmations(&tx, 6);
        let confirmation = feed.check_confirmation(&tx).await.unwrap().unwrap();
        assert!(confirmation.is_confirmed);

        assert_eq!(
            publisher.events_of(EventKind::TransactionConfirmed).len(),
            2
        );
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_silent() {
        let source = Arc::new(MockDataSource::new());
        let (feed, publisher) = feed(source);

        let result = feed.check_confirmation(&TxId::new("missing")).await.unwrap();
        assert!(result.is_none());
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_custom_confirmation_depth() {
        let source = Arc::new(MockDataSource::new());
        let tx = TxId::new("bb22");
        source.set_confirmations(&tx, 2);

        let publisher = Arc::new(InMemoryPublisher::new());
        let feed = ChainFeed::new(
            source,
            publisher,
            Arc::new(ManualClock::new(chrono::Utc::now())),
        )
        .with_required_confirmations(2);

        let confirmation = feed.check_confirmation(&tx).await.unwrap().unwrap();
        assert!(confirmation.is_confirmed);
    }

    #[tokio::test]
    async fn test_fee_refresh_publishes_all_tiers() {
        let source = Arc::new(MockDataSource::new());
        source.set_fees(FeeEstimates {
            low: 1.5,
            medium: 4.0,
            high: 11.0,
        });
        let (feed, publisher) = feed(source);

        let fees = feed.refresh_fee_estimates().await.unwrap();
        assert_eq!(fees.medium, 4.0);

        let updated = publisher.events_of(EventKind::FeeEstimateUpdated);
        assert_eq!(updated.len(), 3);

        let payloads: Vec<FeeEstimateUpdated> =
            updated.iter().map(|e| e.payload_as().unwrap()).collect();
        assert_eq!(payloads[0].priority, FeePriority::Low);
        assert_eq!(payloads[0].sat_per_vbyte, 1.5);
        assert_eq!(payloads[2].priority, FeePriority::High);
        assert_eq!(payloads[2].sat_per_vbyte, 11.0);
    }
}
