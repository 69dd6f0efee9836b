//! Logging sidecar: tails a service's log file and forwards every new
//! record to the log aggregator.

use clap::Parser;
use std::path::PathBuf;

use observability_sidecar::config::load_sidecar_config;
use observability_sidecar::lifecycle::{shutdown_signal, Shutdown};
use observability_sidecar::observability::{logging, metrics};
use observability_sidecar::Sidecar;

#[derive(Parser)]
#[command(name = "logging-sidecar")]
#[command(about = "Tails a JSON log file and forwards new records", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Watched log file, overriding config and environment.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_tracing(logging::DEFAULT_FILTER);

    let mut config = load_sidecar_config(args.config.as_deref())?;
    if let Some(log_file) = args.log_file {
        config.log_file = log_file;
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let sidecar_shutdown = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.trigger();
    });

    Sidecar::new(config)?.run(sidecar_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
