//! Core types for the pool ledger
//!
//! All amounts are exact decimals; cross-entity references are opaque ids.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Satoshis per bitcoin
pub const SATS_PER_BTC: i64 = 100_000_000;

/// Pool currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum Currency {
    /// Bitcoin
    Btc,
}

impl Currency {
    /// Ticker code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Btc => "BTC",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Convert a BTC amount to satoshis
pub fn btc_to_sats(btc: Decimal) -> Decimal {
    btc * Decimal::from(SATS_PER_BTC)
}

/// Convert a satoshi amount to BTC
pub fn sats_to_btc(sats: Decimal) -> Decimal {
    sats / Decimal::from(SATS_PER_BTC)
}

/// Pool-level fund accounting record.
///
/// Invariant: `total_amount == available_amount + reserved_amount`, all
/// three non-negative. Mutated only by the ledger, through the copy-with
/// constructors below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reserve {
    /// Total funds held by the pool
    pub total_amount: Decimal,

    /// Funds not committed to any obligation
    pub available_amount: Decimal,

    /// Funds earmarked for pending obligations
    pub reserved_amount: Decimal,

    /// Pool currency
    pub currency: Currency,
}

impl Reserve {
    /// Opening reserve: everything available, nothing reserved
    pub fn opening(total: Decimal, currency: Currency) -> Self {
        Self {
            total_amount: total,
            available_amount: total,
            reserved_amount: Decimal::ZERO,
            currency,
        }
    }

    /// Copy with `amount` moved from available to reserved
    pub fn with_reservation(&self, amount: Decimal) -> Self {
        Self {
            available_amount: self.available_amount - amount,
            reserved_amount: self.reserved_amount + amount,
            ..self.clone()
        }
    }

    /// Copy with `amount` leaving the pool entirely: the funds were already
    /// earmarked, so available is untouched
    pub fn with_fulfillment(&self, amount: Decimal) -> Self {
        Self {
            total_amount: self.total_amount - amount,
            reserved_amount: self.reserved_amount - amount,
            ..self.clone()
        }
    }

    /// Copy with `amount` returned from reserved to available
    pub fn with_release(&self, amount: Decimal) -> Self {
        Self {
            available_amount: self.available_amount + amount,
            reserved_amount: self.reserved_amount - amount,
            ..self.clone()
        }
    }

    /// Check the conservation invariant
    pub fn validate(&self) -> crate::Result<()> {
        if self.total_amount != self.available_amount + self.reserved_amount {
            return Err(crate::Error::InvariantViolation(format!(
                "total {} != available {} + reserved {}",
                self.total_amount, self.available_amount, self.reserved_amount
            )));
        }

        if self.total_amount < Decimal::ZERO
            || self.available_amount < Decimal::ZERO
            || self.reserved_amount < Decimal::ZERO
        {
            return Err(crate::Error::InvariantViolation(format!(
                "negative balance: total {}, available {}, reserved {}",
                self.total_amount, self.available_amount, self.reserved_amount
            )));
        }

        Ok(())
    }
}

/// Obligation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObligationStatus {
    /// Funds earmarked, payout not yet made
    Pending,
    /// Funds paid out (terminal)
    Fulfilled,
    /// Abandoned, funds returned to the pool (terminal)
    Expired,
}

/// A commitment to eventually pay out a reserved amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    /// Obligation ID
    pub id: Uuid,

    /// Reserved amount
    pub amount: Decimal,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Current status
    pub status: ObligationStatus,
}

impl Obligation {
    /// Create a pending obligation
    pub fn pending(id: Uuid, amount: Decimal, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            amount,
            created_at,
            status: ObligationStatus::Pending,
        }
    }

    /// Copy with status Fulfilled
    pub fn fulfilled(&self) -> Self {
        Self {
            status: ObligationStatus::Fulfilled,
            ..self.clone()
        }
    }

    /// Copy with status Expired
    pub fn expired(&self) -> Self {
        Self {
            status: ObligationStatus::Expired,
            ..self.clone()
        }
    }

    /// Whether the obligation has left the pending state
    pub fn is_terminal(&self) -> bool {
        self.status != ObligationStatus::Pending
    }
}

/// Threshold kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdKind {
    /// Minimum available rate
    Minimum,
    /// Warning available rate
    Warning,
    /// Maximum utilization rate
    Maximum,
}

/// Action suggested by a threshold breach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdAction {
    /// Raise an alert
    Alert,
    /// Pause outbound commitments
    Pause,
    /// Rebalance pool funds
    Rebalance,
}

/// Health threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Which rate the threshold watches
    pub kind: ThresholdKind,

    /// Boundary value (a rate in [0, 1])
    pub value: Decimal,

    /// Action on breach
    pub action: ThresholdAction,
}

/// Pool health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// No thresholds breached
    Healthy,
    /// Alert or rebalance threshold breached
    Warning,
    /// Pause threshold breached
    Critical,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Derived pool health. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolHealth {
    /// Classified status
    pub status: HealthStatus,

    /// Fraction of total funds currently reserved
    pub utilization_rate: f64,

    /// Count of pending obligations (filled in at the ledger level)
    pub pending_obligations: usize,

    /// Thresholds currently breached
    pub threshold_breaches: Vec<Threshold>,
}
