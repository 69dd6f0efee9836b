//! In-memory log store.
//!
//! Append-only, arrival-ordered, volatile. A single mutex guards the
//! sequence so appends, snapshot reads and clears never interleave.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::record::{utc_now, LogRecord, AGGREGATOR_RECEIVED_AT};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("log store lock poisoned")]
    Poisoned,
}

/// Per-origin record counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OriginCounts {
    pub total_logs: usize,
    pub by_service: BTreeMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct LogStore {
    logs: Mutex<Vec<LogRecord>>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<LogRecord>>, StoreError> {
        self.logs.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Stamp `record` with `aggregator_received_at` and append it.
    ///
    /// Returns the stored record and the store size after the append.
    pub fn ingest(&self, record: LogRecord) -> Result<(LogRecord, usize), StoreError> {
        let mut logs = self.lock()?;
        let stamped = record.with_field(AGGREGATOR_RECEIVED_AT, utc_now());
        logs.push(stamped.clone());
        Ok((stamped, logs.len()))
    }

    /// Snapshot of stored records in arrival order.
    ///
    /// With a filter, only records whose `service` equals it exactly are
    /// returned. An empty filter means no filter.
    pub fn list(&self, service: Option<&str>) -> Result<Vec<LogRecord>, StoreError> {
        let logs = self.lock()?;
        let snapshot = match service.filter(|s| !s.is_empty()) {
            Some(wanted) => logs
                .iter()
                .filter(|record| record.service() == Some(wanted))
                .cloned()
                .collect(),
            None => logs.clone(),
        };
        Ok(snapshot)
    }

    /// Count records per origin. Records without `service` count as "unknown".
    pub fn count_by_origin(&self) -> Result<OriginCounts, StoreError> {
        let logs = self.lock()?;
        let mut by_service = BTreeMap::new();
        for record in logs.iter() {
            *by_service.entry(record.origin_key()).or_insert(0) += 1;
        }
        Ok(OriginCounts {
            total_logs: logs.len(),
            by_service,
        })
    }

    /// Remove every record, returning how many were removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let mut logs = self.lock()?;
        let cleared = logs.len();
        logs.clear();
        Ok(cleared)
    }

    /// Number of stored records. Still answers after a poisoned lock.
    pub fn len(&self) -> usize {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Poison the lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.logs.lock();
            panic!("poisoning log store");
        }));
    }
}
