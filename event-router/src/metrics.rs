//! Prometheus metrics for the event router

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

lazy_static! {
    /// Total events published
    pub static ref EVENT_PUBLISH_TOTAL: CounterVec = register_counter_vec!(
        "event_router_publish_total",
        "Total events published",
        &["kind"]
    )
    .unwrap();

    /// Subscriber failures (isolated, never propagated to the publisher)
    pub static ref SUBSCRIBER_FAILURE_TOTAL: CounterVec = register_counter_vec!(
        "event_router_subscriber_failure_total",
        "Total subscriber handler failures",
        &["kind"]
    )
    .unwrap();

    /// Event delivery duration (all subscribers of one publish)
    pub static ref EVENT_DELIVERY_DURATION: HistogramVec = register_histogram_vec!(
        "event_router_delivery_duration_seconds",
        "Event delivery duration in seconds",
        &["kind"]
    )
    .unwrap();
}
