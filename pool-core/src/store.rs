//! In-memory reference store
//!
//! Reserve and obligations live behind one mutex so `commit` writes both as
//! a single unit. A durable implementation replaces this without touching
//! the ledger.

use crate::{
    ledger::LedgerStore,
    types::{Obligation, ObligationStatus, Reserve},
    Result,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

struct Inner {
    reserve: Reserve,
    obligations: HashMap<Uuid, Obligation>,
}

/// In-memory ledger store
pub struct InMemoryLedgerStore {
    inner: Mutex<Inner>,
}

impl InMemoryLedgerStore {
    /// Create a store with the given opening reserve
    pub fn new(reserve: Reserve) -> Self {
        Self {
            inner: Mutex::new(Inner {
                reserve,
                obligations: HashMap::new(),
            }),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load_reserve(&self) -> Result<Reserve> {
        Ok(self.inner.lock().reserve.clone())
    }

    async fn find_obligation(&self, id: Uuid) -> Result<Option<Obligation>> {
        Ok(self.inner.lock().obligations.get(&id).cloned())
    }

    async fn pending_obligations(&self) -> Result<Vec<Obligation>> {
        Ok(self
            .inner
            .lock()
            .obligations
            .values()
            .filter(|o| o.status == ObligationStatus::Pending)
            .cloned()
            .collect())
    }

    async fn commit(&self, reserve: &Reserve, obligation: &Obligation) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.reserve = reserve.clone();
        inner.obligations.insert(obligation.id, obligation.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_commit_writes_both_records() {
        let store = InMemoryLedgerStore::new(Reserve::opening(dec!(100), Currency::Btc));

        let updated = Reserve::opening(dec!(100), Currency::Btc).with_reservation(dec!(25));
        let obligation = Obligation::pending(Uuid::new_v4(), dec!(25), Utc::now());
        store.commit(&updated, &obligation).await.unwrap();

        assert_eq!(store.load_reserve().await.unwrap(), updated);
        assert_eq!(
            store.find_obligation(obligation.id).await.unwrap(),
            Some(obligation.clone())
        );
        assert_eq!(store.pending_obligations().await.unwrap().len(), 1);

        // Upsert replaces the record; fulfilled obligations drop out of the
        // pending view.
        store
            .commit(&updated.with_fulfillment(dec!(25)), &obligation.fulfilled())
            .await
            .unwrap();
        assert!(store.pending_obligations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_missing_obligation() {
        let store = InMemoryLedgerStore::new(Reserve::opening(dec!(1), Currency::Btc));
        assert_eq!(store.find_obligation(Uuid::new_v4()).await.unwrap(), None);
    }
}
