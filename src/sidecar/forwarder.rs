//! Delivers enriched records to the collector.
//!
//! One POST per record, bounded by a timeout, never retried. The outcome is
//! returned as a [`ForwardOutcome`] so callers decide how to report it.

use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::record::LogRecord;

/// Result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The collector answered 200.
    Delivered,
    /// The collector answered with any other status.
    Rejected(StatusCode),
    /// No usable response: connect error, timeout, DNS failure, ...
    TransportFailed(String),
}

impl ForwardOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ForwardOutcome::Delivered)
    }

    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ForwardOutcome::Delivered => "forwarded",
            ForwardOutcome::Rejected(_) => "rejected",
            ForwardOutcome::TransportFailed(_) => "transport_failed",
        }
    }
}

impl fmt::Display for ForwardOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardOutcome::Delivered => write!(f, "delivered"),
            ForwardOutcome::Rejected(status) => write!(f, "rejected: HTTP {}", status.as_u16()),
            ForwardOutcome::TransportFailed(cause) => write!(f, "transport failed: {cause}"),
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ForwarderError(#[from] reqwest::Error);

/// HTTP client bound to one collector endpoint.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    url: String,
}

impl Forwarder {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ForwarderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `record` as JSON. Exactly one attempt is made.
    pub async fn forward(&self, record: &LogRecord) -> ForwardOutcome {
        match self.client.post(&self.url).json(record).send().await {
            Ok(response) if response.status() == StatusCode::OK => ForwardOutcome::Delivered,
            Ok(response) => ForwardOutcome::Rejected(response.status()),
            Err(e) => ForwardOutcome::TransportFailed(e.to_string()),
        }
    }
}
