//! Scheduling types: windows, policies, payments, batches

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default minimum delay for delayed/random policies (5 minutes)
pub const DEFAULT_MIN_DELAY_SECONDS: u64 = 300;

/// Default maximum delay for the random-window policy (1 hour)
pub const DEFAULT_MAX_DELAY_SECONDS: u64 = 3_600;

/// A start/end timestamp pair bounding when a scheduled action may occur
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start
    pub start_time: DateTime<Utc>,

    /// Window end
    pub end_time: DateTime<Utc>,

    /// Window length, seconds
    pub duration_seconds: u64,
}

impl TimeWindow {
    /// Window of `duration_seconds` starting at `start_time`
    pub fn starting_at(start_time: DateTime<Utc>, duration_seconds: u64) -> Self {
        Self {
            start_time,
            end_time: start_time + Duration::seconds(duration_seconds as i64),
            duration_seconds,
        }
    }

    /// Whether `t` falls inside the window (inclusive bounds)
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start_time <= t && t <= self.end_time
    }
}

/// Payout timing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SchedulePolicy {
    /// Pay out now
    Immediate,

    /// Pay out after a fixed minimum delay
    Delayed {
        /// Delay before the payout, seconds
        min_delay_seconds: u64,
    },

    /// Pay out after a delay sampled uniformly from `[min, max)`
    RandomWindow {
        /// Lower delay bound, seconds (inclusive)
        min_delay_seconds: u64,
        /// Upper delay bound, seconds (exclusive)
        max_delay_seconds: u64,
    },
}

impl SchedulePolicy {
    /// Delayed policy with the default 5-minute delay
    pub fn delayed() -> Self {
        SchedulePolicy::Delayed {
            min_delay_seconds: DEFAULT_MIN_DELAY_SECONDS,
        }
    }

    /// Random-window policy with the default 5-minute/1-hour bounds
    pub fn random_window() -> Self {
        SchedulePolicy::RandomWindow {
            min_delay_seconds: DEFAULT_MIN_DELAY_SECONDS,
            max_delay_seconds: DEFAULT_MAX_DELAY_SECONDS,
        }
    }
}

/// Scheduled payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Waiting to be claimed into a batch
    Queued,
    /// Claimed for processing
    Processing,
    /// Executed successfully (terminal)
    Completed,
    /// Retries exhausted (terminal)
    Failed,
}

/// A payout planned under a timing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    /// Payment ID
    pub id: Uuid,

    /// Payout amount
    pub amount: Decimal,

    /// Earliest execution time
    pub scheduled_for: DateTime<Utc>,

    /// Current status
    pub status: PaymentStatus,

    /// Failed execution attempts so far
    pub retry_count: u32,
}

impl ScheduledPayment {
    /// Create a queued payment
    pub fn queued(id: Uuid, amount: Decimal, scheduled_for: DateTime<Utc>) -> Self {
        Self {
            id,
            amount,
            scheduled_for,
            status: PaymentStatus::Queued,
            retry_count: 0,
        }
    }
}

/// Batch status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Created, not yet started
    Pending,
    /// Execution in progress
    Processing,
    /// All payments processed (terminal)
    Completed,
    /// Batch aborted (terminal)
    Failed,
}

/// A group of queued payments claimed together for coordinated processing.
///
/// Payments are referenced by id only; the batch never holds live records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBatch {
    /// Batch ID
    pub id: Uuid,

    /// Claimed payments, in claim order
    pub payment_ids: Vec<Uuid>,

    /// Processing window
    pub window: TimeWindow,

    /// Current status
    pub status: BatchStatus,
}

impl PaymentBatch {
    /// Number of payments in the batch
    pub fn payment_count(&self) -> usize {
        self.payment_ids.len()
    }
}
