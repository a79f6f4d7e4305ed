//! Chain observation event payloads

use crate::types::FeePriority;
use serde::{Deserialize, Serialize};

/// `BLOCK_OBSERVED` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockObserved {
    /// Block height
    pub height: u64,
    /// Transactions in the block
    pub transaction_count: u32,
}

/// `TRANSACTION_CONFIRMED` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfirmed {
    /// Transaction hash
    pub tx_id: String,
    /// Confirmation count
    pub confirmations: u32,
    /// Whether the required depth has been reached
    pub is_confirmed: bool,
}

/// `FEE_ESTIMATE_UPDATED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeEstimateUpdated {
    /// Estimated rate, sat/vByte
    pub sat_per_vbyte: f64,
    /// Priority tier the rate applies to
    pub priority: FeePriority,
}
