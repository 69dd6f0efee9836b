//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use observability_sidecar::config::AggregatorConfig;
use observability_sidecar::{AggregatorServer, LogStore, Shutdown};

/// Start an aggregator on an ephemeral port.
///
/// Returns its address and store; the server stops when `shutdown` fires.
pub async fn start_aggregator(shutdown: &Shutdown) -> (SocketAddr, Arc<LogStore>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = AggregatorServer::new(AggregatorConfig {
        bind_address: addr.to_string(),
        ..AggregatorConfig::default()
    });
    let store = server.store();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, store)
}

/// Poll `check` until it returns true or `deadline` elapses.
#[allow(dead_code)]
pub async fn wait_for<F, Fut>(deadline: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}

/// Client that never reuses connections.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
