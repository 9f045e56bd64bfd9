//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define asset metrics (requests, latency, revalidations, renders)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `asset_requests_total` (counter): requests by asset spec, status
//! - `asset_request_duration_seconds` (histogram): latency by asset spec
//! - `asset_not_modified_total` (counter): 304s by asset spec
//! - `asset_renders_total` (counter): template renders by asset spec
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels limited to asset spec and status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished asset request.
pub fn record_request(asset_spec: &str, status: u16, start: Instant) {
    counter!(
        "asset_requests_total",
        "asset_spec" => asset_spec.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("asset_request_duration_seconds", "asset_spec" => asset_spec.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_not_modified(asset_spec: &str) {
    counter!("asset_not_modified_total", "asset_spec" => asset_spec.to_string()).increment(1);
}

pub fn record_render(asset_spec: &str) {
    counter!("asset_renders_total", "asset_spec" => asset_spec.to_string()).increment(1);
}
