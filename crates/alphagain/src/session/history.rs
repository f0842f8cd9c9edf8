//! Append-only record of the requests made during one session.

use serde::{Deserialize, Serialize};

use crate::pipeline::GenerationResult;
use crate::request::WorkoutRequest;

/// Format of [`HistoryEntry::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One request and the result it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub request: WorkoutRequest,
    pub result: GenerationResult,
    /// Local time the result was recorded, formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(request: WorkoutRequest, result: GenerationResult, timestamp: impl Into<String>) -> Self {
        Self {
            request,
            result,
            timestamp: timestamp.into(),
        }
    }
}

/// Ordered log of [`HistoryEntry`] values. Insertion order is chronological
/// order; entries are never updated or removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// All entries in append order.
    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose generation succeeded.
    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_success()).count()
    }
}
