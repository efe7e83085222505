//! Maps harness and log state to renderable view state. Classification
//! only; no rendering.

use std::time::Duration;

use shared::domain::{DispatchMode, DispatchStatus};

use crate::{DispatchHarness, LogEntry};

/// How many feed lines the activity panel shows. Caps the view, never
/// the underlying store.
pub const VISIBLE_FEED_ENTRIES: usize = 3;

/// How long the "message accepted" state stays visible after the
/// queue-backed path settles. Display pacing only: it is derived from
/// the settlement instant and never touches the in-flight flag or the
/// measured duration.
pub const ASYNC_ACCEPTED_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct ModeView {
    pub mode: DispatchMode,
    pub busy: bool,
    pub label: &'static str,
    pub accepted_recently: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedLine {
    pub order_ref: String,
    pub mode: DispatchMode,
    pub duration_label: String,
    pub status: DispatchStatus,
    pub logged_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub sync: ModeView,
    pub async_mode: ModeView,
    pub feed: Vec<FeedLine>,
    pub total_recorded: u64,
}

pub fn mode_label(mode: DispatchMode) -> &'static str {
    match mode {
        DispatchMode::Sync => "HTTP blocking",
        DispatchMode::Async => "queue-backed",
    }
}

pub fn feed_line(entry: &LogEntry) -> FeedLine {
    FeedLine {
        order_ref: format!("Order #{:04}", entry.id.0),
        mode: entry.mode,
        duration_label: format!("{}ms", entry.duration_ms),
        status: entry.status,
        logged_at: entry.created_at.format("%H:%M:%S").to_string(),
    }
}

pub async fn render(harness: &DispatchHarness) -> ViewState {
    let sync = mode_view(harness, DispatchMode::Sync).await;
    let async_mode = mode_view(harness, DispatchMode::Async).await;
    let feed = harness
        .recent_entries(VISIBLE_FEED_ENTRIES)
        .await
        .iter()
        .map(feed_line)
        .collect();
    ViewState {
        sync,
        async_mode,
        feed,
        total_recorded: harness.recorded_total().await,
    }
}

async fn mode_view(harness: &DispatchHarness, mode: DispatchMode) -> ModeView {
    let accepted_recently = mode == DispatchMode::Async
        && harness.settled_within(mode, ASYNC_ACCEPTED_WINDOW).await;
    ModeView {
        mode,
        busy: harness.is_busy(mode).await,
        label: mode_label(mode),
        accepted_recently,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use shared::domain::EntryId;

    use super::*;

    #[test]
    fn feed_line_formats_entry_for_display() {
        let entry = LogEntry {
            id: EntryId(7),
            mode: DispatchMode::Sync,
            duration_ms: 3021,
            status: DispatchStatus::Success,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 12).unwrap(),
        };

        let line = feed_line(&entry);
        assert_eq!(line.order_ref, "Order #0007");
        assert_eq!(line.duration_label, "3021ms");
        assert_eq!(line.logged_at, "09:30:12");
        assert_eq!(line.status, DispatchStatus::Success);
    }

    #[test]
    fn mode_labels_match_architecture_captions() {
        assert_eq!(mode_label(DispatchMode::Sync), "HTTP blocking");
        assert_eq!(mode_label(DispatchMode::Async), "queue-backed");
    }
}
