//! Destinations for log records.

use super::{LogLevel, LogRecord};
use std::sync::{Arc, Mutex};

/// Target used for every record emitted through `tracing`.
pub const LOG_TARGET: &str = "jeffy";

/// Receives fully-merged log records.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Writes each record as a JSON line through the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        let line = record.to_json().to_string();
        match record.level {
            LogLevel::Debug => tracing::debug!(target: LOG_TARGET, "{}", line),
            LogLevel::Info => tracing::info!(target: LOG_TARGET, "{}", line),
            LogLevel::Warn => tracing::warn!(target: LOG_TARGET, "{}", line),
            LogLevel::Error => tracing::error!(target: LOG_TARGET, "{}", line),
        }
    }
}

/// Keeps records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records emitted so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Records at exactly `level`.
    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.level == level)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}
