use std::net::SocketAddr;

use crate::engine::EngineError;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total HTTP requests. Labels: method, path, status.
pub const HTTP_REQUESTS_TOTAL: &str = "atrium_http_requests_total";

/// Histogram: request latency in seconds. Labels: method, path.
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "atrium_http_request_duration_seconds";

/// Counter: booking admission outcomes. Labels: outcome.
pub const INQUIRIES_TOTAL: &str = "atrium_inquiries_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: venues loaded from the catalog.
pub const VENUES_LOADED: &str = "atrium_venues_loaded";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map an admission failure to a short outcome label for metrics.
pub fn admission_outcome(err: &EngineError) -> &'static str {
    match err {
        EngineError::Validation(_) => "validation_failed",
        EngineError::VenueNotFound => "venue_not_found",
        EngineError::CapacityExceeded { .. } => "capacity_exceeded",
        EngineError::Unavailable { .. } => "conflict",
        EngineError::Store(_) => "internal_error",
    }
}
