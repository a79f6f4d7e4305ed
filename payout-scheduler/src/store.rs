//! In-memory reference payment store
//!
//! Insertion order is tracked explicitly so batch claims drain the queue
//! first-planned-first. `claim_queued` flips payments to Processing inside
//! the store's critical section, which is what makes the claim atomic.

use crate::{
    scheduler::PaymentStore,
    types::{PaymentBatch, PaymentStatus, ScheduledPayment},
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    order: Vec<Uuid>,
    payments: HashMap<Uuid, ScheduledPayment>,
    batches: HashMap<Uuid, PaymentBatch>,
}

/// In-memory payment store
#[derive(Default)]
pub struct InMemoryPaymentStore {
    inner: Mutex<Inner>,
}

impl InMemoryPaymentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payments held (any state)
    pub fn payment_count(&self) -> usize {
        self.inner.lock().payments.len()
    }

    /// Number of batches held (any state)
    pub fn batch_count(&self) -> usize {
        self.inner.lock().batches.len()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn save_payment(&self, payment: ScheduledPayment) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.payments.contains_key(&payment.id) {
            inner.order.push(payment.id);
        }
        inner.payments.insert(payment.id, payment);
        Ok(())
    }

    async fn find_payment(&self, id: Uuid) -> Result<Option<ScheduledPayment>> {
        Ok(self.inner.lock().payments.get(&id).cloned())
    }

    async fn update_payment(&self, payment: ScheduledPayment) -> Result<()> {
        self.inner.lock().payments.insert(payment.id, payment);
        Ok(())
    }

    async fn claim_queued(&self, limit: usize) -> Result<Vec<ScheduledPayment>> {
        let mut inner = self.inner.lock();
        let mut claimed = Vec::new();

        let order = inner.order.clone();
        for id in order {
            if claimed.len() == limit {
                break;
            }
            if let Some(payment) = inner.payments.get_mut(&id) {
                if payment.status == PaymentStatus::Queued {
                    payment.status = PaymentStatus::Processing;
                    claimed.push(payment.clone());
                }
            }
        }

        Ok(claimed)
    }

    async fn due_by(&self, time: DateTime<Utc>) -> Result<Vec<ScheduledPayment>> {
        let inner = self.inner.lock();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.payments.get(id))
            .filter(|p| p.status == PaymentStatus::Queued && p.scheduled_for <= time)
            .cloned()
            .collect())
    }

    async fn save_batch(&self, batch: PaymentBatch) -> Result<()> {
        self.inner.lock().batches.insert(batch.id, batch);
        Ok(())
    }

    async fn find_batch(&self, id: Uuid) -> Result<Option<PaymentBatch>> {
        Ok(self.inner.lock().batches.get(&id).cloned())
    }

    async fn update_batch(&self, batch: PaymentBatch) -> Result<()> {
        self.inner.lock().batches.insert(batch.id, batch);
        Ok(())
    }
}
