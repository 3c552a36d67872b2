// Prometheus metrics registry and collectors

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_histogram_with_registry, CounterVec, Encoder, Histogram, HistogramVec, Opts,
    Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Total number of HTTP requests served
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of HTTP requests"),
        &["endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["endpoint"],
        REGISTRY
    ).unwrap();

    /// Artifact cache operations
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cache_operations_total", "Total artifact cache operations"),
        &["operation"], // operation: hit, miss, write, write_error
        REGISTRY
    ).unwrap();

    /// Outbound source fetches
    pub static ref FETCH_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("fetch_total", "Total outbound source image fetches"),
        &["outcome"], // outcome: ok, error
        REGISTRY
    ).unwrap();

    /// Time spent decoding, compositing, and encoding one image
    pub static ref RENDER_DURATION: Histogram = register_histogram_with_registry!(
        prometheus::HistogramOpts::new("render_duration_seconds", "Compositing pipeline duration")
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        REGISTRY
    ).unwrap();

    /// Captions drawn wider than their surface
    pub static ref LAYOUT_DEGRADED_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("layout_degraded_total", "Captions wider than their surface, drawn clipped"),
        &["position"], // position: top, bottom
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap_or_default();
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
        let metrics = gather_metrics();
        assert!(metrics.contains("requests_total") || metrics.contains("cache_operations_total"));
        assert!(metrics.contains("cache_operations_total"));
    }
}
