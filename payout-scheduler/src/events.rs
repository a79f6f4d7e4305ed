//! Scheduler event payloads

use crate::types::TimeWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `PAYMENT_PLANNED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlanned {
    /// Planned payment
    pub payment_id: Uuid,
    /// Earliest execution time
    pub scheduled_for: DateTime<Utc>,
    /// Processing window start
    pub window_start: DateTime<Utc>,
    /// Processing window end
    pub window_end: DateTime<Utc>,
}

/// `PAYMENT_BATCH_CREATED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBatchCreated {
    /// Created batch
    pub batch_id: Uuid,
    /// Number of payments claimed
    pub payment_count: usize,
    /// Batch processing window
    pub window: TimeWindow,
}

/// `PAYMENT_EXECUTED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentExecuted {
    /// Executed payment
    pub payment_id: Uuid,
    /// Batch the execution ran under, when any
    pub batch_id: Option<Uuid>,
    /// Whether the execution succeeded
    pub success: bool,
}
