//! Cascade Chain Feed
//!
//! Read-only blockchain observation. The data source is an injected
//! collaborator exposing scalar values only (height, confirmation counts,
//! tiered fee estimates); the feed normalizes those into events and never
//! parses raw chain data.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod error;
pub mod events;
pub mod feed;
pub mod mock;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use feed::{BlockchainDataSource, ChainFeed, DEFAULT_REQUIRED_CONFIRMATIONS};
pub use mock::MockDataSource;
pub use types::{Confirmation, FeeEstimates, FeePriority, TxId, TxInfo};
