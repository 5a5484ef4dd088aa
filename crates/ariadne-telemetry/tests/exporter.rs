//! Installing the Prometheus exporter.
//!
//! Kept in its own test binary because the recorder is process-global.

use std::time::Duration;

use ariadne_telemetry::metrics::{record_failure, record_request, render_metrics};
use ariadne_telemetry::{init_metrics, MetricsConfig};

fn free_local_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}

#[tokio::test]
async fn exporter_installs_and_renders_dispatch_metrics() {
    let config = MetricsConfig {
        enabled: true,
        addr: free_local_addr(),
        ..Default::default()
    };

    init_metrics(&config).unwrap();

    record_request("GET", 200, Duration::from_millis(3));
    record_failure("panic");

    let rendered = render_metrics().unwrap();
    assert!(rendered.contains("ariadne_requests_total"), "{rendered}");
    assert!(rendered.contains("ariadne_dispatch_failures_total"), "{rendered}");
}
