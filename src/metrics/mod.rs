// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    ACQUISITIONS_TOTAL,
    ACQUISITION_DURATION,
    PROVIDER_ATTEMPTS,
};

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, duration_secs: f64) {
    let status = status_code.to_string();
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint, &status])
        .observe(duration_secs);
}

/// Helper to record a single provider attempt
pub fn record_provider_attempt(provider: &str, outcome: &str) {
    PROVIDER_ATTEMPTS
        .with_label_values(&[provider, outcome])
        .inc();
}

/// Helper to record a finished acquisition
pub fn record_acquisition(source: &str, duration_secs: f64) {
    ACQUISITIONS_TOTAL.with_label_values(&[source]).inc();
    ACQUISITION_DURATION
        .with_label_values(&[source])
        .observe(duration_secs);
}
