//! Mock data source for tests and demos

use crate::{
    feed::BlockchainDataSource,
    types::{FeeEstimates, TxId, TxInfo},
    Result,
};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Scriptable in-memory data source
pub struct MockDataSource {
    height: AtomicU64,
    transactions: DashMap<String, u32>,
    fees: Mutex<FeeEstimates>,
}

impl MockDataSource {
    /// Create a source at height zero with flat fees
    pub fn new() -> Self {
        Self {
            height: AtomicU64::new(0),
            transactions: DashMap::new(),
            fees: Mutex::new(FeeEstimates {
                low: 1.0,
                medium: 3.0,
                high: 8.0,
            }),
        }
    }

    /// Set the chain tip height
    pub fn set_height(&self, height: u64) {
        self.height.store(height, Ordering::Relaxed);
    }

    /// Set the confirmation count of a transaction
    pub fn set_confirmations(&self, tx_id: &TxId, confirmations: u32) {
        self.transactions
            .insert(tx_id.as_str().to_string(), confirmations);
    }

    /// Set the fee estimates
    pub fn set_fees(&self, fees: FeeEstimates) {
        *self.fees.lock() = fees;
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockchainDataSource for MockDataSource {
    async fn current_height(&self) -> Result<u64> {
        Ok(self.height.load(Ordering::Relaxed))
    }

    async fn transaction(&self, tx_id: &TxId) -> Result<Option<TxInfo>> {
        Ok(self
            .transactions
            .get(tx_id.as_str())
            .map(|confirmations| TxInfo {
                confirmations: *confirmations,
            }))
    }

    async fn fee_estimates(&self) -> Result<FeeEstimates> {
        Ok(*self.fees.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_roundtrip() {
        let source = MockDataSource::new();
        source.set_height(101);
        source.set_confirmations(&TxId::new("cc33"), 4);

        assert_eq!(source.current_height().await.unwrap(), 101);
        assert_eq!(
            source.transaction(&TxId::new("cc33")).await.unwrap(),
            Some(TxInfo { confirmations: 4 })
        );
        assert_eq!(source.transaction(&TxId::new("nope")).await.unwrap(), None);
    }
}
