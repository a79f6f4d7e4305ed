//! Cascade Token Issuer
//!
//! Single-use address tokens scoped to a namespace and purpose.
//!
//! # State machine
//!
//! `active -> resolved (terminal)` or `active -> expired (terminal)`; the
//! `is_expired` flag flips exactly once, either by TTL sweep or by
//! usage-based consumption. Resolution of a usage-limited token is an
//! atomic check-and-mark: of two concurrent resolutions exactly one wins.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod events;
pub mod issuer;
pub mod store;
pub mod types;

// Re-exports
pub use config::IssuerConfig;
pub use error::{Error, Result};
pub use issuer::{TokenIssuer, TokenStore};
pub use store::InMemoryTokenStore;
pub use types::{AddressToken, ExpirationPolicy, ExpiryReason, Namespace, PolicyKind, Purpose};
