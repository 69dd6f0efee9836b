//! The sidecar loop: tail → parse → enrich → forward.
//!
//! Each line is handled in isolation. A malformed line, a rejected record,
//! a transport failure or even a panic while handling one line is logged
//! and the loop moves on to the next line.

use futures_util::FutureExt;
use std::io;
use std::panic::AssertUnwindSafe;
use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::config::SidecarConfig;
use crate::observability::metrics;
use crate::record::LogRecord;
use crate::sidecar::enricher::Enricher;
use crate::sidecar::forwarder::{ForwardOutcome, Forwarder, ForwarderError};
use crate::sidecar::tailer::Tailer;

/// What happened to one observed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Empty line; nothing to forward.
    Blank,
    /// Not a JSON object; discarded.
    Malformed,
    /// A forward attempt was made.
    Forwarded(ForwardOutcome),
}

impl LineOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            LineOutcome::Blank => "blank",
            LineOutcome::Malformed => "malformed",
            LineOutcome::Forwarded(outcome) => outcome.label(),
        }
    }
}

pub struct Sidecar {
    config: SidecarConfig,
    enricher: Enricher,
    forwarder: Forwarder,
}

impl Sidecar {
    pub fn new(config: SidecarConfig) -> Result<Self, ForwarderError> {
        let enricher = Enricher::new(&config.service_name, config.environment.clone());
        let forwarder = Forwarder::new(config.aggregator_url.clone(), config.forward_timeout())?;
        Ok(Self {
            config,
            enricher,
            forwarder,
        })
    }

    /// Run until `shutdown` fires.
    ///
    /// Only fails if the log file exists but cannot be opened.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> io::Result<()> {
        tracing::info!(
            service = %self.config.service_name,
            log_file = %self.config.log_file.display(),
            aggregator_url = %self.forwarder.url(),
            "Logging sidecar starting"
        );

        let poll_interval = self.config.poll_interval();
        let mut tailer = tokio::select! {
            tailer = Tailer::open(&self.config.log_file, poll_interval) => tailer?,
            _ = shutdown.recv() => {
                tracing::info!("Shutdown before log file appeared");
                return Ok(());
            }
        };

        loop {
            tokio::select! {
                line = tailer.next_line() => match line {
                    Ok(line) => self.handle_line(&line).await,
                    Err(e) => {
                        tracing::warn!(path = %tailer.path().display(), error = %e, "Failed to read log file");
                        sleep(poll_interval).await;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Logging sidecar stopping");
                    break;
                }
            }
        }
        Ok(())
    }

    async fn handle_line(&self, line: &str) {
        match AssertUnwindSafe(self.process_line(line)).catch_unwind().await {
            Ok(outcome) => metrics::record_line(outcome.label()),
            Err(_) => {
                tracing::error!("Unexpected failure while processing log line; continuing");
                metrics::record_line("panicked");
            }
        }
    }

    /// Parse, enrich and forward a single line.
    pub async fn process_line(&self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() {
            tracing::debug!("Skipping blank line");
            return LineOutcome::Blank;
        }

        let record = match LogRecord::parse_line(line) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid JSON in log file");
                return LineOutcome::Malformed;
            }
        };

        let enriched = self.enricher.enrich(&record);
        let outcome = self.forwarder.forward(&enriched).await;
        let message = record.message().unwrap_or("N/A");

        match &outcome {
            ForwardOutcome::Delivered => tracing::info!(log_message = message, "Forwarded log"),
            ForwardOutcome::Rejected(status) => {
                tracing::warn!(status = status.as_u16(), log_message = message, "Failed to forward log")
            }
            ForwardOutcome::TransportFailed(cause) => {
                tracing::warn!(error = %cause, log_message = message, "Error forwarding log")
            }
        }

        LineOutcome::Forwarded(outcome)
    }
}
