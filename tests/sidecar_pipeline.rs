//! Sidecar end to end: log file → sidecar → aggregator.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use observability_sidecar::config::SidecarConfig;
use observability_sidecar::{Shutdown, Sidecar};

mod common;

fn append(path: &Path, text: &str) {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

fn config(log_file: &Path, aggregator: std::net::SocketAddr) -> SidecarConfig {
    SidecarConfig {
        log_file: log_file.to_path_buf(),
        aggregator_url: format!("http://{aggregator}/logs"),
        service_name: "user-service".into(),
        poll_interval_ms: 25,
        forward_timeout_ms: 1_000,
        ..SidecarConfig::default()
    }
}

#[tokio::test]
async fn test_forwards_only_new_valid_lines() {
    let shutdown = Shutdown::new();
    let (addr, store) = common::start_aggregator(&shutdown).await;

    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("app.log");
    append(&log_file, "{\"service\":\"user-service\",\"message\":\"before start\"}\n");

    let sidecar = Sidecar::new(config(&log_file, addr)).unwrap();
    let handle = tokio::spawn(sidecar.run(shutdown.subscribe()));

    // Give the tailer time to open the file at end-of-file.
    tokio::time::sleep(Duration::from_millis(200)).await;

    append(&log_file, "{\"service\":\"user-service\",\"message\":\"one\",\"user_id\":7}\n");
    append(&log_file, "this is not json\n");
    append(&log_file, "\n");
    append(&log_file, "{\"service\":\"user-service\",\"message\":\"two\"}\n");

    let arrived = common::wait_for(Duration::from_secs(5), || {
        let store = store.clone();
        async move { store.len() >= 2 }
    })
    .await;
    assert!(arrived, "expected two forwarded records");

    // Nothing else trickles in.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let logs = store.list(None).unwrap();
    assert_eq!(logs.len(), 2);

    let messages: Vec<_> = logs.iter().map(|r| r.message().unwrap()).collect();
    assert_eq!(messages, ["one", "two"]);

    let first = &logs[0];
    assert_eq!(first.get("user_id"), Some(&serde_json::json!(7)));
    assert_eq!(first.get("sidecar_forwarded_by").unwrap(), "user-service-logging-sidecar");
    assert_eq!(first.get("environment").unwrap(), "docker-compose");
    assert!(first.get("sidecar_timestamp").unwrap().as_str().unwrap().ends_with('Z'));
    assert!(first.get("aggregator_received_at").is_some());

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_waits_for_file_then_forwards() {
    let shutdown = Shutdown::new();
    let (addr, store) = common::start_aggregator(&shutdown).await;

    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("late.log");

    let sidecar = Sidecar::new(config(&log_file, addr)).unwrap();
    let handle = tokio::spawn(sidecar.run(shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(100)).await;
    append(&log_file, "");
    tokio::time::sleep(Duration::from_millis(200)).await;
    append(&log_file, "{\"service\":\"user-service\",\"message\":\"late\"}\n");

    let arrived = common::wait_for(Duration::from_secs(5), || {
        let store = store.clone();
        async move { store.len() == 1 }
    })
    .await;
    assert!(arrived);

    shutdown.trigger();
    let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
}

#[tokio::test]
async fn test_collector_outage_drops_records_but_keeps_running() {
    let shutdown = Shutdown::new();

    // Reserve a port, then free it so nothing is listening there.
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("app.log");
    append(&log_file, "");

    let sidecar = Sidecar::new(config(&log_file, dead_addr)).unwrap();
    let handle = tokio::spawn(sidecar.run(shutdown.subscribe()));
    tokio::time::sleep(Duration::from_millis(200)).await;

    append(&log_file, "{\"message\":\"lost\"}\n");
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!handle.is_finished(), "sidecar must survive transport failures");

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
    assert!(result.is_ok());
}
