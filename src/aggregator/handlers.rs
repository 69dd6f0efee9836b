//! Ingest and query endpoints.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::aggregator::error::ApiError;
use crate::aggregator::server::AppState;
use crate::aggregator::store::OriginCounts;
use crate::observability::metrics;
use crate::record::LogRecord;

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LogList {
    pub total: usize,
    pub logs: Vec<LogRecord>,
}

#[derive(Debug, Serialize)]
pub struct ClearResult {
    pub status: &'static str,
    pub cleared: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
    pub logs_stored: usize,
}

/// `POST /logs`
pub async fn ingest_log(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusMessage>, ApiError> {
    let record = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|value| LogRecord::try_from(value).ok())
        .filter(|record| !record.is_empty())
        .ok_or(ApiError::MissingBody)?;

    let (stored, size) = state.store.ingest(record)?;

    tracing::info!(
        "Received log from {}: {}",
        stored.service().unwrap_or("unknown"),
        stored.message().unwrap_or("N/A")
    );
    let entry = Value::Object(stored.as_map().clone());
    tracing::debug!(%entry, "Full log entry");
    metrics::record_ingest(&stored.origin_key(), size);

    Ok(Json(StatusMessage {
        status: "success",
        message: "Log received",
    }))
}

/// `GET /logs[?service=<name>]`
///
/// Only the first `service` parameter is used; other parameters are ignored.
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<LogList>, ApiError> {
    let service = params
        .iter()
        .find(|(key, _)| key == "service")
        .map(|(_, value)| value.as_str());
    let logs = state.store.list(service)?;
    Ok(Json(LogList {
        total: logs.len(),
        logs,
    }))
}

/// `GET /logs/count`
pub async fn count_logs(
    State(state): State<AppState>,
) -> Result<Json<OriginCounts>, ApiError> {
    Ok(Json(state.store.count_by_origin()?))
}

/// `POST /logs/clear`
pub async fn clear_logs(State(state): State<AppState>) -> Result<Json<ClearResult>, ApiError> {
    let cleared = state.store.clear()?;
    tracing::info!(cleared, "Cleared {} logs", cleared);
    metrics::record_clear(cleared);
    Ok(Json(ClearResult {
        status: "success",
        cleared,
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: state.service_name.to_string(),
        logs_stored: state.store.len(),
    })
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "Log Aggregator",
        "endpoints": {
            "POST /logs": "Receive logs from sidecars",
            "GET /logs": "Retrieve all logs (optional ?service=<name> filter)",
            "GET /logs/count": "Get log counts by service",
            "POST /logs/clear": "Clear all stored logs",
            "GET /health": "Health check",
        },
        "current_log_count": state.store.len(),
    }))
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
