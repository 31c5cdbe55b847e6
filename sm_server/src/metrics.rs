//! Prometheus metrics for the hand history store.
//!
//! Metrics are exposed in Prometheus text format on a separate listener when
//! `METRICS_BIND` is set.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use sm_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::hands_created_total();
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Hand History Metrics
// ============================================================================

/// Increment stored hands counter.
pub fn hands_created_total() {
    metrics::counter!("hands_created_total").increment(1);
}

/// Increment rejected hand submissions counter.
pub fn hands_rejected_total() {
    metrics::counter!("hands_rejected_total").increment(1);
}

/// Record how many log lines a stored hand carried.
pub fn hand_actions(count: usize) {
    metrics::histogram!("hand_actions").record(count as f64);
}

/// Increment hand list requests counter.
pub fn hands_listed_total() {
    metrics::counter!("hands_listed_total").increment(1);
}

/// Increment hand lookups counter.
pub fn hand_lookups_total(found: bool) {
    metrics::counter!("hand_lookups_total", "found" => found.to_string()).increment(1);
}

/// Increment storage errors counter.
pub fn store_errors_total(operation: &'static str) {
    metrics::counter!("store_errors_total", "operation" => operation).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_exporter_is_a_noop() {
        http_requests_total("GET", 200);
        http_request_duration_ms("GET", 1.5);
        hands_created_total();
        hands_rejected_total();
        hand_actions(12);
        hands_listed_total();
        hand_lookups_total(false);
        store_errors_total("create");
    }
}
