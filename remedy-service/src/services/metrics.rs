//! Metrics module for remedy-service.
//! Provides Prometheus metrics for lookups, store queries and provider calls.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "remedy_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Lookup counter by endpoint and outcome
pub static LOOKUPS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Third-party provider call counter
pub static PROVIDER_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Third-party provider call duration histogram
pub static PROVIDER_CALL_DURATION: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup; repeated calls are no-ops.
pub fn init_metrics() {
    LOOKUPS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "remedy_lookups_total",
                "Total remedy lookups by endpoint and outcome"
            ),
            &["endpoint", "outcome"]
        )
        .expect("Failed to register LOOKUPS_TOTAL")
    });

    PROVIDER_CALLS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "remedy_provider_calls_total",
                "Total third-party provider calls by provider and status"
            ),
            &["provider", "status"]
        )
        .expect("Failed to register PROVIDER_CALLS_TOTAL")
    });

    // Generation calls take seconds, not milliseconds
    PROVIDER_CALL_DURATION.get_or_init(|| {
        register_histogram_vec!(
            histogram_opts!(
                "remedy_provider_call_duration_seconds",
                "Third-party provider call duration",
                vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
            ),
            &["provider"]
        )
        .expect("Failed to register PROVIDER_CALL_DURATION")
    });

    let _ = &*DB_QUERY_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record the outcome of a lookup.
pub fn record_lookup(endpoint: &str, outcome: &str) {
    if let Some(counter) = LOOKUPS_TOTAL.get() {
        counter.with_label_values(&[endpoint, outcome]).inc();
    }
}

/// Record a provider call and its duration.
pub fn record_provider_call(provider: &str, status: &str, duration_secs: f64) {
    if let Some(counter) = PROVIDER_CALLS_TOTAL.get() {
        counter.with_label_values(&[provider, status]).inc();
    }
    if let Some(histogram) = PROVIDER_CALL_DURATION.get() {
        histogram
            .with_label_values(&[provider])
            .observe(duration_secs);
    }
}
