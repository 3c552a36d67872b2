// Metrics module for Prometheus observability

mod registry;

pub use registry::{
    gather_metrics, CACHE_OPERATIONS, FETCH_TOTAL, LAYOUT_DEGRADED_TOTAL, REGISTRY,
    RENDER_DURATION, REQUESTS_TOTAL, REQUEST_DURATION,
};

/// Helper to record request metrics
pub fn record_request(endpoint: &str, status_code: u16, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status_code.to_string()])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helpers to record artifact cache operations
pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

pub fn record_cache_write() {
    CACHE_OPERATIONS.with_label_values(&["write"]).inc();
}

pub fn record_cache_write_error() {
    CACHE_OPERATIONS.with_label_values(&["write_error"]).inc();
}

/// Helper to record outbound fetch outcomes
pub fn record_fetch(ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    FETCH_TOTAL.with_label_values(&[outcome]).inc();
}

/// Helper to record a caption drawn wider than its surface
pub fn record_layout_degraded(position: &str) {
    LAYOUT_DEGRADED_TOTAL.with_label_values(&[position]).inc();
}
