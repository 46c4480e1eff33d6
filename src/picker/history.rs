// Selection history: a newest-first, capped log of completed picks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single completed selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub participant_number: u32,
    pub timestamp: DateTime<Utc>,
}

/// Log of completed selections, newest first, truncated to `cap` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cap: usize,
}

impl History {
    pub fn new(cap: usize) -> Self {
        History {
            entries: Vec::new(),
            cap,
        }
    }

    /// Restore from persisted entries, enforcing the cap. Entries are
    /// stored newest-first, so truncation drops the oldest picks.
    pub fn from_entries(mut entries: Vec<HistoryEntry>, cap: usize) -> Self {
        entries.truncate(cap);
        History { entries, cap }
    }

    /// Record a completed selection at the head of the log.
    pub fn record(&mut self, participant_number: u32, timestamp: DateTime<Utc>) {
        self.entries.insert(
            0,
            HistoryEntry {
                participant_number,
                timestamp,
            },
        );
        self.entries.truncate(self.cap);
    }

    /// Entries newest-first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
