// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of HTTP requests
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of API requests"),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // ACQUISITION METRICS
    // ============================================================================

    /// Completed acquisitions, labelled by the source that produced the image
    pub static ref ACQUISITIONS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("acquisitions_total", "Total completed image acquisitions"),
        &["source"],
        REGISTRY
    ).unwrap();

    /// Wall-clock time of a whole acquisition run
    pub static ref ACQUISITION_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("acquisition_duration_seconds", "Image acquisition duration")
            .buckets(vec![0.001, 0.01, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["source"],
        REGISTRY
    ).unwrap();

    /// Individual provider attempts
    pub static ref PROVIDER_ATTEMPTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("provider_attempts_total", "Total provider attempts"),
        &["provider", "outcome"], // outcome: success, unavailable, upstream_error, no_results, implausible_payload
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Vectors only show up once a label set has been touched
        PROVIDER_ATTEMPTS.with_label_values(&["unsplash", "success"]).inc();
        ACQUISITIONS_TOTAL.with_label_values(&["synthetic"]).inc();

        let metrics = gather_metrics();
        assert!(metrics.contains("provider_attempts_total"));
        assert!(metrics.contains("acquisitions_total"));
    }
}
