//! Semi-structured log records.
//!
//! A [`LogRecord`] is an open JSON object. Producers conventionally set
//! `service`, `message` and `timestamp`; the sidecar and the aggregator add
//! their own provenance fields. Unknown fields are carried through verbatim
//! and keep their original order.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Producer identity field.
pub const SERVICE: &str = "service";
/// Human-readable message field.
pub const MESSAGE: &str = "message";
/// Time the sidecar enriched the record.
pub const SIDECAR_TIMESTAMP: &str = "sidecar_timestamp";
/// Identity of the sidecar that forwarded the record.
pub const SIDECAR_FORWARDED_BY: &str = "sidecar_forwarded_by";
/// Deployment environment tag.
pub const ENVIRONMENT: &str = "environment";
/// Time the aggregator accepted the record.
pub const AGGREGATOR_RECEIVED_AT: &str = "aggregator_received_at";

/// Key used when grouping records that carry no `service` field.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Reasons a raw line cannot become a [`LogRecord`].
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// An open-ended structured log record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(Map<String, Value>);

impl LogRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Parse a single line of newline-delimited JSON.
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(line)?;
        Self::try_from(value)
    }

    /// Return a copy of this record with `key` set to `value`.
    ///
    /// An existing field with the same name is overwritten in place.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `service` field, if it is present and a string.
    pub fn service(&self) -> Option<&str> {
        self.0.get(SERVICE).and_then(Value::as_str)
    }

    /// The `message` field, if it is present and a string.
    pub fn message(&self) -> Option<&str> {
        self.0.get(MESSAGE).and_then(Value::as_str)
    }

    /// Key this record is counted under when grouping by origin.
    pub fn origin_key(&self) -> String {
        match self.0.get(SERVICE) {
            None => UNKNOWN_SERVICE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for LogRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Array(_) => Err(RecordError::NotAnObject("array")),
            Value::String(_) => Err(RecordError::NotAnObject("string")),
            Value::Number(_) => Err(RecordError::NotAnObject("number")),
            Value::Bool(_) => Err(RecordError::NotAnObject("boolean")),
            Value::Null => Err(RecordError::NotAnObject("null")),
        }
    }
}

/// Format a UTC instant as ISO-8601 with microseconds and a `Z` suffix.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current UTC time, formatted with [`format_timestamp`].
pub fn utc_now() -> String {
    format_timestamp(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_object_line() {
        let record = LogRecord::parse_line(r#"{"service":"user-service","message":"hi","n":3}"#).unwrap();
        assert_eq!(record.service(), Some("user-service"));
        assert_eq!(record.message(), Some("hi"));
        assert_eq!(record.get("n"), Some(&json!(3)));
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(matches!(LogRecord::parse_line("not json"), Err(RecordError::Json(_))));
        assert!(matches!(
            LogRecord::parse_line("[1,2]"),
            Err(RecordError::NotAnObject("array"))
        ));
        assert!(matches!(
            LogRecord::parse_line("42"),
            Err(RecordError::NotAnObject("number"))
        ));
    }

    #[test]
    fn test_field_order_is_preserved() {
        let record = LogRecord::parse_line(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<&String> = record.as_map().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);

        let record = record.with_field("a", 9);
        let keys: Vec<&String> = record.as_map().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(record.get("a"), Some(&json!(9)));
    }

    #[test]
    fn test_origin_key() {
        let named = LogRecord::new().with_field(SERVICE, "orders");
        assert_eq!(named.origin_key(), "orders");

        assert_eq!(LogRecord::new().origin_key(), UNKNOWN_SERVICE);

        let numeric = LogRecord::new().with_field(SERVICE, 7);
        assert_eq!(numeric.origin_key(), "7");
        assert_eq!(numeric.service(), None);
    }

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01T12:30:05.000000Z");

        let now = utc_now();
        assert!(now.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
