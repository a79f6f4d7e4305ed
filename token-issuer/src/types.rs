//! Token types and expiration policies

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fallback TTL when a policy defines none (24 hours)
pub const DEFAULT_TTL_SECONDS: u64 = 86_400;

/// Purpose a namespace is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Inbound funds
    Deposit,
    /// Outbound payout
    Withdrawal,
    /// Internal transfer
    Internal,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Purpose::Deposit => "deposit",
            Purpose::Withdrawal => "withdrawal",
            Purpose::Internal => "internal",
        };
        write!(f, "{}", s)
    }
}

/// Scoping tag under which a token is issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Opaque namespace value
    pub value: String,

    /// Purpose of the namespace
    pub purpose: Purpose,
}

/// Expiration policy kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Expires when the TTL elapses
    TimeBased,
    /// Expires when the usage budget is consumed
    UsageBased,
    /// Expires on whichever comes first
    Hybrid,
}

/// Expiration policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationPolicy {
    /// Policy kind
    pub kind: PolicyKind,

    /// Time to live, seconds
    pub ttl_seconds: Option<u64>,

    /// Usage budget
    pub max_usages: Option<u32>,
}

impl ExpirationPolicy {
    /// Time-based policy
    pub fn time_based(ttl_seconds: u64) -> Self {
        Self {
            kind: PolicyKind::TimeBased,
            ttl_seconds: Some(ttl_seconds),
            max_usages: None,
        }
    }

    /// Usage-based policy (no TTL)
    pub fn usage_based(max_usages: u32) -> Self {
        Self {
            kind: PolicyKind::UsageBased,
            ttl_seconds: None,
            max_usages: Some(max_usages),
        }
    }

    /// Hybrid policy: TTL and usage budget
    pub fn hybrid(ttl_seconds: u64, max_usages: u32) -> Self {
        Self {
            kind: PolicyKind::Hybrid,
            ttl_seconds: Some(ttl_seconds),
            max_usages: Some(max_usages),
        }
    }

    /// Whether a successful resolution consumes the token
    pub fn consumes_on_resolve(&self) -> bool {
        matches!(self.kind, PolicyKind::UsageBased | PolicyKind::Hybrid)
    }
}

/// Why a token expired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryReason {
    /// TTL elapsed
    Ttl,
    /// Usage budget consumed
    Usage,
    /// Operator action
    Manual,
}

/// Single-use address token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressToken {
    /// Token ID
    pub id: Uuid,

    /// Namespace the token was issued under
    pub namespace: Namespace,

    /// Expiration policy the token was issued with
    pub policy: ExpirationPolicy,

    /// Issue timestamp
    pub created_at: DateTime<Utc>,

    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,

    /// Whether the token has reached a terminal state
    pub is_expired: bool,

    /// Why the token expired, once it has
    pub expired_reason: Option<ExpiryReason>,
}

impl AddressToken {
    /// Issue a fresh token under `namespace` with `policy`.
    ///
    /// `expires_at` is `created_at + ttl`, falling back to 24 hours when the
    /// policy defines no TTL.
    pub fn issue(
        id: Uuid,
        namespace: Namespace,
        policy: ExpirationPolicy,
        created_at: DateTime<Utc>,
    ) -> Self {
        let ttl = policy.ttl_seconds.unwrap_or(DEFAULT_TTL_SECONDS);

        Self {
            id,
            namespace,
            policy,
            created_at,
            expires_at: created_at + Duration::seconds(ttl as i64),
            is_expired: false,
            expired_reason: None,
        }
    }
}
