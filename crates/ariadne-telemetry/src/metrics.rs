//! Prometheus metrics for dispatches.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `ariadne_requests_total` | Counter | `method`, `status` | Completed dispatches |
//! | `ariadne_request_duration_seconds` | Histogram | `method` | Dispatch latency |
//! | `ariadne_in_flight_requests` | Gauge | - | Dispatches in progress |
//! | `ariadne_dispatch_failures_total` | Counter | `kind` | Failures caught at the dispatch boundary |
//!
//! Recording without an installed recorder is a no-op, so the dispatcher
//! records unconditionally.

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Completed dispatch counter.
pub const REQUESTS_TOTAL: &str = "ariadne_requests_total";

/// Dispatch latency histogram.
pub const REQUEST_DURATION_SECONDS: &str = "ariadne_request_duration_seconds";

/// In-flight dispatch gauge.
pub const IN_FLIGHT_REQUESTS: &str = "ariadne_in_flight_requests";

/// Failure counter.
pub const DISPATCH_FAILURES_TOTAL: &str = "ariadne_dispatch_failures_total";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Address the Prometheus scrape endpoint listens on.
    pub addr: String,

    /// Histogram buckets for dispatch duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
            // 1ms .. 10s
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Installs the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime; the exporter spawns its
/// HTTP listener onto it.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidAddress` for an unparsable address and
/// `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let (recorder, exporter) = PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .and_then(PrometheusBuilder::build)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let handle = recorder.handle();
    metrics::set_global_recorder(recorder)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = exporter.await {
            tracing::warn!(error = ?e, "metrics exporter stopped");
        }
    });

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(REQUESTS_TOTAL, "Total number of dispatched requests");
    describe_histogram!(REQUEST_DURATION_SECONDS, "Dispatch duration in seconds");
    describe_gauge!(IN_FLIGHT_REQUESTS, "Number of dispatches in progress");
    describe_counter!(
        DISPATCH_FAILURES_TOTAL,
        "Failures caught at the dispatch boundary, by kind"
    );
}

/// Records a completed dispatch.
pub fn record_request(method: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(REQUEST_DURATION_SECONDS, "method" => method.to_string())
        .record(duration.as_secs_f64());
}

/// Records a failure translated into the internal-error response.
///
/// `kind` is a short label such as `"error"` or `"panic"`.
pub fn record_failure(kind: &'static str) {
    counter!(DISPATCH_FAILURES_TOTAL, "kind" => kind).increment(1);
}

/// Guard that tracks one in-flight dispatch.
///
/// The gauge is decremented on drop, so it stays correct when the
/// dispatch future is cancelled or unwinds.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}
