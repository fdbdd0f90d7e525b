//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - External services (Spotify, Ticketmaster)
//! - Pipeline runs and bucketing

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service call duration in seconds.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "encore_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests by outcome.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "encore_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "result"], // "success", "rate_limited", "error"
    )
    .unwrap()
});

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Pipeline runs by result.
pub static PIPELINE_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("encore_pipeline_runs_total", "Total concert pipeline runs"),
        &["result"], // "success", "invalid_request", "token_exchange", "top_artists"
    )
    .unwrap()
});

/// Pipeline run duration in seconds, pacing delays included.
pub static PIPELINE_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "encore_pipeline_duration_seconds",
            "Duration of a full concert pipeline run",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 60.0]),
    )
    .unwrap()
});

/// Events left out of the calendar because the bucketing cap was reached.
pub static EVENTS_TRUNCATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "encore_events_truncated_total",
        "Events dropped by the month bucketing iteration cap",
    )
    .unwrap()
});

/// All core metrics, for registration with the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // External services
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
        // Pipeline
        Box::new(PIPELINE_RUNS.clone()),
        Box::new(PIPELINE_DURATION.clone()),
        Box::new(EVENTS_TRUNCATED.clone()),
    ]
}
