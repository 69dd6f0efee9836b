//! End-to-end tests of the aggregator HTTP surface over a real socket.

use serde_json::{json, Value};
use std::sync::Arc;

use observability_sidecar::Shutdown;

mod common;

#[tokio::test]
async fn test_post_then_list_scenario() {
    let shutdown = Shutdown::new();
    let (addr, _) = common::start_aggregator(&shutdown).await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/logs"))
        .json(&json!({"service": "user-service", "message": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = client.get(format!("http://{addr}/logs")).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["total"], 1);
    let log = body["logs"][0].as_object().unwrap();
    let keys: Vec<&str> = log.keys().map(String::as_str).collect();
    assert_eq!(keys, ["service", "message", "aggregator_received_at"]);
    assert_eq!(log["service"], "user-service");
    assert_eq!(log["message"], "hi");
    let received = log["aggregator_received_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(received).is_ok());
    assert!(received.ends_with('Z'));

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_without_body_is_rejected() {
    let shutdown = Shutdown::new();
    let (addr, store) = common::start_aggregator(&shutdown).await;
    let client = common::client();

    let res = client.post(format!("http://{addr}/logs")).send().await.unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "No JSON data provided"}));

    let res = client
        .post(format!("http://{addr}/logs"))
        .header("content-type", "application/json")
        .body("{broken")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(store.len(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_count_clear_cycle() {
    let shutdown = Shutdown::new();
    let (addr, _) = common::start_aggregator(&shutdown).await;
    let client = common::client();

    for service in ["a", "a", "b"] {
        let res = client
            .post(format!("http://{addr}/logs"))
            .json(&json!({"service": service, "message": "m"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let counts: Value = client.get(format!("http://{addr}/logs/count")).send().await.unwrap().json().await.unwrap();
    assert_eq!(counts, json!({"total_logs": 3, "by_service": {"a": 2, "b": 1}}));

    let cleared: Value = client.post(format!("http://{addr}/logs/clear")).send().await.unwrap().json().await.unwrap();
    assert_eq!(cleared, json!({"status": "success", "cleared": 3}));

    let counts: Value = client.get(format!("http://{addr}/logs/count")).send().await.unwrap().json().await.unwrap();
    assert_eq!(counts, json!({"total_logs": 0, "by_service": {}}));

    let health: Value = client.get(format!("http://{addr}/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(health, json!({"status": "healthy", "service": "log-aggregator", "logs_stored": 0}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_posts_are_all_stored() {
    let shutdown = Shutdown::new();
    let (addr, _) = common::start_aggregator(&shutdown).await;
    let client = Arc::new(common::client());

    let concurrency = 10;
    let per_task = 20;
    let mut handles = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..per_task {
                let res = client
                    .post(format!("http://{addr}/logs"))
                    .json(&json!({"service": format!("svc-{}", task % 2), "seq": i}))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(res.status(), 200);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let body: Value = client.get(format!("http://{addr}/logs")).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["total"], concurrency * per_task);

    let filtered: Value = client
        .get(format!("http://{addr}/logs"))
        .query(&[("service", "svc-0")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filtered["total"], concurrency / 2 * per_task);
    assert!(filtered["logs"].as_array().unwrap().iter().all(|l| l["service"] == "svc-0"));

    let counts: Value = client.get(format!("http://{addr}/logs/count")).send().await.unwrap().json().await.unwrap();
    let sum: u64 = counts["by_service"].as_object().unwrap().values().map(|v| v.as_u64().unwrap()).sum();
    assert_eq!(sum, counts["total_logs"].as_u64().unwrap());

    shutdown.trigger();
}
