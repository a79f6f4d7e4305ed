//! Payout planning and batch management
//!
//! `plan_payment` persists a queued payment and announces its processing
//! window; `create_batch` atomically claims queued payments in insertion
//! order. Claiming transitions a payment to Processing inside the store's
//! critical section, so the same payment can never land in two batches.

use crate::{
    config::SchedulerConfig,
    events::{PaymentBatchCreated, PaymentExecuted, PaymentPlanned},
    types::{BatchStatus, PaymentBatch, PaymentStatus, SchedulePolicy, ScheduledPayment, TimeWindow},
    Error, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use event_router::{Event, EventKind, EventPublisher};
use pool_core::{Clock, IdSource, Jitter};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Repository port for scheduled payments and batches.
///
/// `claim_queued` must atomically flip up to `limit` queued payments to
/// Processing, in insertion order, and return them; two concurrent claims
/// must never return the same payment.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Persist a freshly planned payment
    async fn save_payment(&self, payment: ScheduledPayment) -> Result<()>;

    /// Find a payment by id
    async fn find_payment(&self, id: Uuid) -> Result<Option<ScheduledPayment>>;

    /// Replace a payment record
    async fn update_payment(&self, payment: ScheduledPayment) -> Result<()>;

    /// Atomically claim up to `limit` queued payments in insertion order
    async fn claim_queued(&self, limit: usize) -> Result<Vec<ScheduledPayment>>;

    /// Queued payments scheduled at or before `time`, in insertion order
    async fn due_by(&self, time: DateTime<Utc>) -> Result<Vec<ScheduledPayment>>;

    /// Persist a freshly created batch
    async fn save_batch(&self, batch: PaymentBatch) -> Result<()>;

    /// Find a batch by id
    async fn find_batch(&self, id: Uuid) -> Result<Option<PaymentBatch>>;

    /// Replace a batch record
    async fn update_batch(&self, batch: PaymentBatch) -> Result<()>;
}

/// Payout scheduler
pub struct PayoutScheduler {
    config: SchedulerConfig,
    store: Arc<dyn PaymentStore>,
    publisher: Arc<dyn EventPublisher>,
    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
    jitter: Arc<dyn Jitter>,
    exec_lock: Mutex<()>,
}

impl PayoutScheduler {
    /// Create a scheduler over the given store and capabilities
    pub fn new(
        config: SchedulerConfig,
        store: Arc<dyn PaymentStore>,
        publisher: Arc<dyn EventPublisher>,
        ids: Arc<dyn IdSource>,
        clock: Arc<dyn Clock>,
        jitter: Arc<dyn Jitter>,
    ) -> Self {
        Self {
            config,
            store,
            publisher,
            ids,
            clock,
            jitter,
            exec_lock: Mutex::new(()),
        }
    }

    /// Plan a payout under `policy`.
    ///
    /// One clock read drives the schedule and every window boundary.
    pub async fn plan_payment(
        &self,
        amount: Decimal,
        policy: SchedulePolicy,
    ) -> Result<ScheduledPayment> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }

        let now = self.clock.now();
        let (scheduled_for, window) = match policy {
            SchedulePolicy::Immediate => (
                now,
                TimeWindow::starting_at(now, self.config.plan_window_seconds),
            ),
            SchedulePolicy::Delayed { min_delay_seconds } => {
                let scheduled_for = now + Duration::seconds(min_delay_seconds as i64);
                (
                    scheduled_for,
                    TimeWindow::starting_at(scheduled_for, self.config.plan_window_seconds),
                )
            }
            SchedulePolicy::RandomWindow {
                min_delay_seconds,
                max_delay_seconds,
            } => {
                let delay = self
                    .jitter
                    .delay_seconds(min_delay_seconds, max_delay_seconds);
                let scheduled_for = now + Duration::seconds(delay as i64);
                (
                    scheduled_for,
                    TimeWindow::starting_at(scheduled_for, max_delay_seconds),
                )
            }
        };

        let payment = ScheduledPayment::queued(self.ids.next_id(), amount, scheduled_for);
        self.store.save_payment(payment.clone()).await?;

        self.publisher
            .publish(Event::new(
                EventKind::PaymentPlanned,
                &PaymentPlanned {
                    payment_id: payment.id,
                    scheduled_for,
                    window_start: window.start_time,
                    window_end: window.end_time,
                },
                now,
            )?)
            .await?;

        info!(payment_id = %payment.id, %amount, %scheduled_for, "payment planned");
        Ok(payment)
    }

    /// Claim queued payments into a batch, up to the configured batch size.
    ///
    /// Returns `Ok(None)` when nothing is queued: no batch is persisted and
    /// no event is emitted.
    pub async fn create_batch(&self) -> Result<Option<PaymentBatch>> {
        self.create_batch_sized(self.config.batch_size).await
    }

    /// Claim queued payments into a batch with an explicit size cap
    pub async fn create_batch_sized(&self, batch_size: usize) -> Result<Option<PaymentBatch>> {
        let now = self.clock.now();

        let claimed = self.store.claim_queued(batch_size).await?;
        if claimed.is_empty() {
            debug!("no queued payments, batch not created");
            return Ok(None);
        }

        let window = TimeWindow::starting_at(now, self.config.batch_window_seconds);
        let batch = PaymentBatch {
            id: self.ids.next_id(),
            payment_ids: claimed.iter().map(|p| p.id).collect(),
            window: window.clone(),
            status: BatchStatus::Pending,
        };
        self.store.save_batch(batch.clone()).await?;

        self.publisher
            .publish(Event::new(
                EventKind::PaymentBatchCreated,
                &PaymentBatchCreated {
                    batch_id: batch.id,
                    payment_count: batch.payment_count(),
                    window,
                },
                now,
            )?)
            .await?;

        info!(batch_id = %batch.id, payment_count = batch.payment_count(), "batch created");
        Ok(Some(batch))
    }

    /// Queued payments whose scheduled time has passed
    pub async fn due_payments(&self) -> Result<Vec<ScheduledPayment>> {
        self.store.due_by(self.clock.now()).await
    }

    /// Record the outcome of executing a claimed payment.
    ///
    /// Success completes the payment. Failure increments the retry count and
    /// requeues it until the retry budget is exhausted, then marks it
    /// failed. Only a Processing payment can be recorded; anything else
    /// returns `None` with no side effect.
    pub async fn record_execution(
        &self,
        payment_id: Uuid,
        batch_id: Option<Uuid>,
        success: bool,
    ) -> Result<Option<ScheduledPayment>> {
        let now = self.clock.now();

        let payment = {
            let _guard = self.exec_lock.lock().await;

            let Some(mut payment) = self.store.find_payment(payment_id).await? else {
                return Ok(None);
            };
            if payment.status != PaymentStatus::Processing {
                return Ok(None);
            }

            if success {
                payment.status = PaymentStatus::Completed;
            } else {
                payment.retry_count += 1;
                payment.status = if payment.retry_count < self.config.max_retries {
                    PaymentStatus::Queued
                } else {
                    PaymentStatus::Failed
                };
            }

            self.store.update_payment(payment.clone()).await?;
            payment
        };

        self.publisher
            .publish(Event::new(
                EventKind::PaymentExecuted,
                &PaymentExecuted {
                    payment_id,
                    batch_id,
                    success,
                },
                now,
            )?)
            .await?;

        info!(%payment_id, success, status = ?payment.status, "execution recorded");
        Ok(Some(payment))
    }

    /// Move a pending batch into processing
    pub async fn begin_batch(&self, batch_id: Uuid) -> Result<bool> {
        let _guard = self.exec_lock.lock().await;

        let Some(mut batch) = self.store.find_batch(batch_id).await? else {
            return Ok(false);
        };
        if batch.status != BatchStatus::Pending {
            return Ok(false);
        }

        batch.status = BatchStatus::Processing;
        self.store.update_batch(batch).await?;
        Ok(true)
    }

    /// Close out a processing batch
    pub async fn finish_batch(&self, batch_id: Uuid, success: bool) -> Result<bool> {
        let _guard = self.exec_lock.lock().await;

        let Some(mut batch) = self.store.find_batch(batch_id).await? else {
            return Ok(false);
        };
        if batch.status != BatchStatus::Processing {
            return Ok(false);
        }

        batch.status = if success {
            BatchStatus::Completed
        } else {
            BatchStatus::Failed
        };
        self.store.update_batch(batch).await?;
        Ok(true)
    }
}
