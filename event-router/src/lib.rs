//! In-process event router
//!
//! Provides typed publish/subscribe fan-out with:
//! - Per-kind subscriber registries plus an all-events set
//! - Best-effort broadcast: a failing subscriber never blocks the rest
//! - Exactly one delivery per subscription per publish
//! - Observability via Prometheus metrics

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod error;
pub mod event;
pub mod metrics;
pub mod router;
pub mod sinks;

pub use error::{Error, Result};
pub use event::{Event, EventKind};
pub use router::{EventPublisher, EventRouter, Subscriber, SubscriptionId};
pub use sinks::{InMemoryPublisher, RecordingSink, TracingSink};
