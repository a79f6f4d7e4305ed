//! Ledger event payloads

use crate::types::HealthStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why reserved liquidity was released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseReason {
    /// Funds paid out
    Fulfilled,
    /// Obligation abandoned, funds returned to the pool
    Expired,
}

/// `LIQUIDITY_RESERVED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityReserved {
    /// Obligation backing the reservation
    pub obligation_id: Uuid,
    /// Reserved amount
    pub amount: Decimal,
}

/// `LIQUIDITY_RELEASED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityReleased {
    /// Obligation the release settles
    pub obligation_id: Uuid,
    /// Released amount
    pub amount: Decimal,
    /// Release reason
    pub reason: ReleaseReason,
}

/// `POOL_HEALTH_CHANGED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolHealthChanged {
    /// Classification before the mutation
    pub previous_status: HealthStatus,
    /// Classification after the mutation
    pub new_status: HealthStatus,
    /// Utilization rate after the mutation
    pub utilization_rate: f64,
}
