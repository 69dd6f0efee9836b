//! HTTP server setup for the aggregator.
//!
//! # Responsibilities
//! - Own the [`LogStore`] and hand it to handlers through [`AppState`]
//! - Create the Axum router with every endpoint
//! - Wire up middleware (request ID, tracing, body limit)
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::aggregator::handlers::*;
use crate::aggregator::store::LogStore;
use crate::config::AggregatorConfig;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LogStore>,
    pub service_name: Arc<str>,
}

/// HTTP server for the log aggregator.
pub struct AggregatorServer {
    router: Router,
    config: AggregatorConfig,
    store: Arc<LogStore>,
}

impl AggregatorServer {
    /// Create a server with a fresh, empty store.
    pub fn new(config: AggregatorConfig) -> Self {
        Self::with_store(config, Arc::new(LogStore::new()))
    }

    /// Create a server around an existing store.
    pub fn with_store(config: AggregatorConfig, store: Arc<LogStore>) -> Self {
        let state = AppState {
            store: store.clone(),
            service_name: Arc::from(config.service_name.as_str()),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            store,
        }
    }

    fn build_router(config: &AggregatorConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/health", get(health))
            .route("/logs", post(ingest_log).get(list_logs))
            .route("/logs/count", get(count_logs))
            .route("/logs/clear", post(clear_logs))
            .fallback(not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn store(&self) -> Arc<LogStore> {
        self.store.clone()
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Log aggregator ready to receive logs at POST /logs");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Log aggregator stopped");
        Ok(())
    }
}
