//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, category
//! - `gateway_request_duration_seconds` (histogram): latency by category
//! - `gateway_upstream_errors_total` (counter): failed upstream calls by kind
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Label for requests that never reach a registered category: unknown
/// categories and requests turned away by the auth gate.
pub const UNREGISTERED: &str = "unregistered";

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, category: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "category" => category.to_string()
    )
    .increment(1);

    histogram!(
        "gateway_request_duration_seconds",
        "category" => category.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(category: &str, kind: &'static str) {
    counter!(
        "gateway_upstream_errors_total",
        "category" => category.to_string(),
        "kind" => kind
    )
    .increment(1);
}
