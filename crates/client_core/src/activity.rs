use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use shared::domain::{DispatchMode, DispatchStatus, EntryId};

/// One settled dispatch. Immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: EntryId,
    pub mode: DispatchMode,
    pub duration_ms: u64,
    pub status: DispatchStatus,
    pub created_at: DateTime<Utc>,
}

/// Newest-first activity store. Ids are assigned here, from a counter
/// that only moves forward, so every entry ever recorded has a distinct
/// id and head order matches settlement order.
///
/// The store itself is unbounded; the display cap is applied by the
/// view layer. `count` is therefore the true number of settlements.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        mode: DispatchMode,
        duration_ms: u64,
        status: DispatchStatus,
        created_at: DateTime<Utc>,
    ) -> LogEntry {
        self.next_id += 1;
        let entry = LogEntry {
            id: EntryId(self.next_id),
            mode,
            duration_ms,
            status,
            created_at,
        };
        self.entries.push_front(entry.clone());
        entry
    }

    /// Non-mutating view of the newest `n` entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().take(n)
    }

    pub fn count(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Drops all entries. The id counter survives so ids never repeat
    /// within a session.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "tests/activity_tests.rs"]
mod tests;
