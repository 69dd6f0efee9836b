//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sidecar_lines_total` (counter): lines seen by the sidecar, by outcome
//! - `aggregator_logs_ingested_total` (counter): accepted records, by service
//! - `aggregator_logs_stored` (gauge): current store size
//! - `aggregator_logs_cleared_total` (counter): records removed by clear

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_line(outcome: &'static str) {
    counter!("sidecar_lines_total", "outcome" => outcome).increment(1);
}

pub fn record_ingest(service: &str, stored: usize) {
    counter!("aggregator_logs_ingested_total", "service" => service.to_string()).increment(1);
    gauge!("aggregator_logs_stored").set(stored as f64);
}

pub fn record_clear(cleared: usize) {
    counter!("aggregator_logs_cleared_total").increment(cleared as u64);
    gauge!("aggregator_logs_stored").set(0.0);
}
