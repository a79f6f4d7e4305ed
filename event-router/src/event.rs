//! Event envelope for publish/subscribe

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event kind (type discriminant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Liquidity reserved against the pool
    LiquidityReserved,
    /// Reserved liquidity released (fulfilled or expired)
    LiquidityReleased,
    /// Pool health classification changed
    PoolHealthChanged,
    /// Address token emitted
    AddressTokenEmitted,
    /// Address token resolved
    AddressTokenResolved,
    /// Address token expired
    AddressTokenExpired,
    /// Payment planned under a scheduling policy
    PaymentPlanned,
    /// Payment batch created
    PaymentBatchCreated,
    /// Payment execution recorded
    PaymentExecuted,
    /// Block observed on chain
    BlockObserved,
    /// Transaction confirmation count updated
    TransactionConfirmed,
    /// Fee estimate tier updated
    FeeEstimateUpdated,
}

impl EventKind {
    /// Wire name for this event kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::LiquidityReserved => "LIQUIDITY_RESERVED",
            EventKind::LiquidityReleased => "LIQUIDITY_RELEASED",
            EventKind::PoolHealthChanged => "POOL_HEALTH_CHANGED",
            EventKind::AddressTokenEmitted => "ADDRESS_TOKEN_EMITTED",
            EventKind::AddressTokenResolved => "ADDRESS_TOKEN_RESOLVED",
            EventKind::AddressTokenExpired => "ADDRESS_TOKEN_EXPIRED",
            EventKind::PaymentPlanned => "PAYMENT_PLANNED",
            EventKind::PaymentBatchCreated => "PAYMENT_BATCH_CREATED",
            EventKind::PaymentExecuted => "PAYMENT_EXECUTED",
            EventKind::BlockObserved => "BLOCK_OBSERVED",
            EventKind::TransactionConfirmed => "TRANSACTION_CONFIRMED",
            EventKind::FeeEstimateUpdated => "FEE_ESTIMATE_UPDATED",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event ID (UUIDv7 for ordering)
    pub id: Uuid,

    /// Event kind
    pub kind: EventKind,

    /// Payload (JSON-serialized)
    pub payload: serde_json::Value,

    /// Timestamp captured by the originating operation
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Create a new event from a typed payload.
    ///
    /// The timestamp is supplied by the caller: each operation captures a
    /// single `now` and reuses it for every timestamp it derives.
    pub fn new<P: Serialize>(kind: EventKind, payload: &P, at: DateTime<Utc>) -> Result<Self> {
        let payload =
            serde_json::to_value(payload).map_err(|e| Error::Serialization(e.to_string()))?;

        Ok(Self {
            id: Uuid::now_v7(),
            kind,
            payload,
            timestamp: at,
        })
    }

    /// Deserialize the payload into a typed value
    pub fn payload_as<P: serde::de::DeserializeOwned>(&self) -> Result<P> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, serde::Deserialize, PartialEq, Debug)]
    struct Payload {
        amount: u64,
    }

    #[test]
    fn test_event_creation() {
        let at = Utc::now();
        let event = Event::new(EventKind::LiquidityReserved, &Payload { amount: 30 }, at).unwrap();

        assert_eq!(event.kind, EventKind::LiquidityReserved);
        assert_eq!(event.timestamp, at);
        assert_eq!(event.payload, json!({"amount": 30}));
    }

    #[test]
    fn test_payload_roundtrip() {
        let event =
            Event::new(EventKind::PaymentPlanned, &Payload { amount: 7 }, Utc::now()).unwrap();
        let payload: Payload = event.payload_as().unwrap();
        assert_eq!(payload, Payload { amount: 7 });
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(EventKind::LiquidityReserved.as_str(), "LIQUIDITY_RESERVED");
        assert_eq!(EventKind::PoolHealthChanged.as_str(), "POOL_HEALTH_CHANGED");
        assert_eq!(
            EventKind::PaymentBatchCreated.as_str(),
            "PAYMENT_BATCH_CREATED"
        );
    }
}
