//! Chain observation types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction identifier (hex hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(String);

impl TxId {
    /// Create a transaction id
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Confirmation state of an observed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Confirmation count
    pub count: u32,

    /// Whether the required depth has been reached
    pub is_confirmed: bool,
}

/// Scalar view of a transaction exposed by the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInfo {
    /// Confirmation count
    pub confirmations: u32,
}

/// Fee estimate priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeePriority {
    /// Slow confirmation target
    Low,
    /// Medium confirmation target
    Medium,
    /// Fast confirmation target
    High,
}

impl FeePriority {
    /// All tiers, slowest first
    pub fn all() -> [FeePriority; 3] {
        [FeePriority::Low, FeePriority::Medium, FeePriority::High]
    }
}

/// Tiered fee estimates in sat/vByte
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeEstimates {
    /// Low-priority rate
    pub low: f64,
    /// Medium-priority rate
    pub medium: f64,
    /// High-priority rate
    pub high: f64,
}

impl FeeEstimates {
    /// Rate for a priority tier
    pub fn tier(&self, priority: FeePriority) -> f64 {
        match priority {
            FeePriority::Low => self.low,
            FeePriority::Medium => self.medium,
            FeePriority::High => self.high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_tiers() {
        let fees = FeeEstimates {
            low: 2.0,
            medium: 5.0,
            high: 12.0,
        };

        assert_eq!(fees.tier(FeePriority::Low), 2.0);
        assert_eq!(fees.tier(FeePriority::Medium), 5.0);
        assert_eq!(fees.tier(FeePriority::High), 12.0);
    }

    #[test]
    fn test_txid_display() {
        let tx = TxId::new("deadbeef");
        assert_eq!(tx.as_str(), "deadbeef");
        assert_eq!(tx.to_string(), "deadbeef");
    }
}
