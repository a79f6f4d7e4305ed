//! Cascade Payout Scheduler
//!
//! Plans individual payouts under a timing policy and groups queued
//! payments into processing batches.
//!
//! # Timing policies
//!
//! - **Immediate**: pay now, one-minute processing window
//! - **Delayed**: pay after a fixed minimum delay
//! - **Random window**: delay sampled uniformly from a cryptographically
//!   strong source, so payout timing resists correlation analysis
//!
//! Batch creation atomically claims queued payments in insertion order; a
//! payment can never land in two batches.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod store;
pub mod types;

// Re-exports
pub use config::SchedulerConfig;
pub use error::{Error, Result};
pub use scheduler::{PaymentStore, PayoutScheduler};
pub use store::InMemoryPaymentStore;
pub use types::{
    BatchStatus, PaymentBatch, PaymentStatus, SchedulePolicy, ScheduledPayment, TimeWindow,
};
