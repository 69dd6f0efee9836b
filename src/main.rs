//! Log aggregator.
//!
//! # Architecture Overview
//!
//! ```text
//!   logging sidecars                    ┌──────────────────────────────┐
//!   ─────────────── POST /logs ────────▶│  handlers ──▶ LogStore       │
//!                                       │               (Mutex<Vec>)   │
//!   operators / logs-cli                │                  ▲           │
//!   ─── GET /logs, /logs/count ────────▶│  handlers ───────┘           │
//!   ─── POST /logs/clear, GET /health ─▶│                              │
//!                                       └──────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use observability_sidecar::config::load_aggregator_config;
use observability_sidecar::lifecycle::{shutdown_signal, Shutdown};
use observability_sidecar::observability::{logging, metrics};
use observability_sidecar::AggregatorServer;

#[derive(Parser)]
#[command(name = "log-aggregator")]
#[command(about = "Collects log records forwarded by logging sidecars", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding config and environment.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_tracing(logging::DEFAULT_FILTER);

    tracing::info!("log-aggregator v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = load_aggregator_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.bind_address,
        max_body_bytes = config.max_body_bytes,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.trigger();
    });

    AggregatorServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
