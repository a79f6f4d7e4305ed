//! Token event payloads

use crate::types::ExpiryReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `ADDRESS_TOKEN_EMITTED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressTokenEmitted {
    /// Token that was issued
    pub token_id: Uuid,
    /// Namespace value the token is scoped to
    pub namespace: String,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

/// `ADDRESS_TOKEN_RESOLVED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressTokenResolved {
    /// Token that was resolved
    pub token_id: Uuid,
}

/// `ADDRESS_TOKEN_EXPIRED` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressTokenExpired {
    /// Token that expired
    pub token_id: Uuid,
    /// Expiry reason
    pub reason: ExpiryReason,
}
