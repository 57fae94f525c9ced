//! Metrics collection and exposition.
//!
//! # Metrics
//! - `admin_routes_requests_total` (counter): requests by method, route, status
//! - `admin_routes_request_duration_seconds` (histogram): latency distribution
//! - `admin_routes_table_reloads_total` (counter): route table swaps by outcome
//!
//! # Design Decisions
//! - Unmatched requests are recorded under the route label `none`
//! - Recording is a no-op until a recorder is installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("admin_routes_requests_total", &labels).increment(1);
    metrics::histogram!("admin_routes_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a route table reload attempt.
pub fn record_reload(accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    metrics::counter!("admin_routes_table_reloads_total", "outcome" => outcome).increment(1);
}
