//! Per-file progress reporting.
//!
//! The pipeline announces each stage through a [`StatusSink`] instead of
//! printing. `TracingSink` forwards updates to structured logs; `MemorySink`
//! keeps the latest message per file for embedders that render progress
//! themselves.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::info;

/// Abstraction over status reporting backends.
///
/// `TracingSink` implements this for structured logs. Tests can provide a
/// recording implementation.
pub trait StatusSink: Send + Sync {
    /// Record a progress message for a file.
    fn record(&self, filename: &str, message: &str);
}

/// Sink that emits status updates as log events.
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn record(&self, filename: &str, message: &str) {
        info!(file = %filename, "{message}");
    }
}

/// A recorded status update.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub message: String,
    pub updated_at: DateTime<Utc>,
}

/// Sink that keeps the latest message per file in memory.
#[derive(Default)]
pub struct MemorySink {
    entries: Mutex<HashMap<String, StatusEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest message recorded for `filename`, if any.
    pub fn latest(&self, filename: &str) -> Option<StatusEntry> {
        self.lock().get(filename).cloned()
    }

    /// Snapshot of every file's latest entry.
    pub fn snapshot(&self) -> HashMap<String, StatusEntry> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StatusEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatusSink for MemorySink {
    fn record(&self, filename: &str, message: &str) {
        self.lock().insert(
            filename.to_string(),
            StatusEntry {
                message: message.to_string(),
                updated_at: Utc::now(),
            },
        );
    }
}
