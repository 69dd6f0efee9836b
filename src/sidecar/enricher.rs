//! Attaches forwarding provenance to a record.

use chrono::{DateTime, Utc};

use crate::record::{
    format_timestamp, LogRecord, ENVIRONMENT, SIDECAR_FORWARDED_BY, SIDECAR_TIMESTAMP,
};

/// Stamps records with `sidecar_timestamp`, `sidecar_forwarded_by` and
/// `environment`. Enrichment fields always overwrite same-named input fields.
#[derive(Debug, Clone)]
pub struct Enricher {
    forwarded_by: String,
    environment: String,
}

impl Enricher {
    pub fn new(origin: &str, environment: impl Into<String>) -> Self {
        Self {
            forwarded_by: format!("{origin}-logging-sidecar"),
            environment: environment.into(),
        }
    }

    /// Return an enriched copy of `record`, stamped with the current time.
    pub fn enrich(&self, record: &LogRecord) -> LogRecord {
        self.enrich_at(record, Utc::now())
    }

    pub fn enrich_at(&self, record: &LogRecord, now: DateTime<Utc>) -> LogRecord {
        record
            .clone()
            .with_field(SIDECAR_TIMESTAMP, format_timestamp(now))
            .with_field(SIDECAR_FORWARDED_BY, self.forwarded_by.as_str())
            .with_field(ENVIRONMENT, self.environment.as_str())
    }

    pub fn forwarded_by(&self) -> &str {
        &self.forwarded_by
    }
}

/// One-shot form of [`Enricher::enrich`].
pub fn enrich(record: &LogRecord, origin: &str, environment: &str) -> LogRecord {
    Enricher::new(origin, environment).enrich(record)
}
