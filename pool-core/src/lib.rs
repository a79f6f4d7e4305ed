//! Cascade Pool Core
//!
//! Liquidity reservation ledger for pooled custody.
//!
//! # Architecture
//!
//! - **Conservation**: `total == available + reserved` before and after
//!   every ledger operation, all amounts non-negative
//! - **Single Writer**: reserve/fulfill/expire serialize through one write
//!   lock, so concurrent reservations never overcommit funds
//! - **Derived Health**: pool health is a pure function of the reserve
//!   snapshot, never persisted
//! - **Events After Commit**: state transitions publish through the event
//!   router once the mutation has committed

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod clock;
pub mod config;
pub mod entropy;
pub mod error;
pub mod events;
pub mod health;
pub mod ledger;
pub mod store;
pub mod types;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use entropy::{FixedJitter, IdSource, Jitter, OsJitter, SecureIdSource, SequentialIdSource};
pub use error::{Error, Result};
pub use ledger::{LedgerStore, LiquidityLedger, ReserveOutcome};
pub use store::InMemoryLedgerStore;
pub use types::{
    Currency, HealthStatus, Obligation, ObligationStatus, PoolHealth, Reserve, Threshold,
    ThresholdAction, ThresholdKind,
};
