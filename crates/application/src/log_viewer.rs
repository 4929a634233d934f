//! Filtered, exportable view over the log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, warn};

use validash_core::AppResult;
use validash_domain::{LogEntry, StatusFilter};

use crate::log_store::{LogStore, LogSubscription};
use crate::notification_service::NotificationService;
use crate::validation_dataset::ValidationDataset;

#[cfg(test)]
mod tests;

/// Column headers of an exported log, in order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "Domain ID",
    "Model",
    "Status",
    "Endpoint",
    "Time",
    "State",
    "Value",
];

/// File name of an exported log.
pub const EXPORT_FILE_NAME: &str = "api_logs.xlsx";

/// MIME type of an exported log.
pub const EXPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Returns entries whose endpoint contains `search_term` (ignoring case) and
/// whose status passes `status`. Order is preserved.
#[must_use]
pub fn filter_entries(
    entries: &[LogEntry],
    search_term: &str,
    status: StatusFilter,
) -> Vec<LogEntry> {
    let needle = search_term.to_lowercase();

    entries
        .iter()
        .filter(|entry| status.matches(entry.status()))
        .filter(|entry| entry.endpoint().to_lowercase().contains(needle.as_str()))
        .cloned()
        .collect()
}

/// Search and status criteria of the log table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Case-insensitive endpoint substring; empty matches everything.
    pub search_term: String,
    /// Status criterion.
    pub status: StatusFilter,
}

impl LogFilter {
    /// Creates a filter.
    #[must_use]
    pub fn new(search_term: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search_term: search_term.into(),
            status,
        }
    }

    /// Applies this filter to `entries`.
    #[must_use]
    pub fn apply(&self, entries: &[LogEntry]) -> Vec<LogEntry> {
        filter_entries(entries, self.search_term.as_str(), self.status)
    }
}

/// Tabular form of log entries handed to a [`SpreadsheetExporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    rows: Vec<[String; 7]>,
}

impl ExportTable {
    /// Returns the column headers.
    #[must_use]
    pub fn headers(&self) -> &[&'static str] {
        &EXPORT_COLUMNS
    }

    /// Returns the data rows, one per entry, in entry order.
    #[must_use]
    pub fn rows(&self) -> &[[String; 7]] {
        &self.rows
    }
}

/// Maps entries to export rows.
#[must_use]
pub fn build_export_table(entries: &[LogEntry]) -> ExportTable {
    let rows = entries
        .iter()
        .map(|entry| {
            [
                entry.domain_id().to_owned(),
                entry.model().to_owned(),
                entry.status().as_str().to_owned(),
                entry.endpoint().to_owned(),
                entry.time().to_owned(),
                entry.status().state_label().to_owned(),
                entry.value().to_owned(),
            ]
        })
        .collect();

    ExportTable { rows }
}

/// Port rendering an export table into a workbook.
pub trait SpreadsheetExporter: Send + Sync {
    /// Serializes `table` into file bytes.
    fn render(&self, table: &ExportTable) -> AppResult<Vec<u8>>;
}

/// Downloadable export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Workbook bytes.
    pub bytes: Vec<u8>,
}

/// Renders `entries` through `exporter`.
pub fn export_entries(
    exporter: &dyn SpreadsheetExporter,
    entries: &[LogEntry],
) -> AppResult<ExportArtifact> {
    let table = build_export_table(entries);
    let bytes = exporter.render(&table)?;

    Ok(ExportArtifact {
        file_name: EXPORT_FILE_NAME.to_owned(),
        content_type: EXPORT_CONTENT_TYPE.to_owned(),
        bytes,
    })
}

#[derive(Debug, Default)]
struct ViewerState {
    snapshot: Vec<LogEntry>,
    filter: LogFilter,
    applied_refreshes: u64,
    ignored_refreshes: u64,
}

struct LogViewerInner {
    exporter: Arc<dyn SpreadsheetExporter>,
    dataset: Arc<dyn ValidationDataset>,
    notifications: NotificationService,
    state: Mutex<ViewerState>,
}

impl LogViewerInner {
    fn lock(&self) -> MutexGuard<'_, ViewerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply_snapshot(&self, entries: &[LogEntry]) {
        let mut state = self.lock();
        if state.snapshot.as_slice() == entries {
            state.ignored_refreshes += 1;
            return;
        }

        state.snapshot = entries.to_vec();
        state.applied_refreshes += 1;
        debug!(entry_count = entries.len(), "log viewer snapshot refreshed");
    }
}

/// Live view of the log with search, status filter and export.
///
/// The view stays subscribed to the log store until it is dropped.
pub struct LogViewer {
    inner: Arc<LogViewerInner>,
    _subscription: LogSubscription,
}

impl LogViewer {
    /// Subscribes to `store` and loads the current snapshot.
    pub async fn mount(
        store: &LogStore,
        exporter: Arc<dyn SpreadsheetExporter>,
        dataset: Arc<dyn ValidationDataset>,
        notifications: NotificationService,
    ) -> Self {
        let inner = Arc::new(LogViewerInner {
            exporter,
            dataset,
            notifications,
            state: Mutex::new(ViewerState::default()),
        });

        let weak_inner: Weak<LogViewerInner> = Arc::downgrade(&inner);
        let subscription = store
            .subscribe_with_snapshot(move |entries: &[LogEntry]| {
                if let Some(inner) = weak_inner.upgrade() {
                    inner.apply_snapshot(entries);
                }
            })
            .await;

        Self {
            inner,
            _subscription: subscription,
        }
    }

    /// Returns the whole current snapshot, most recent first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.inner.lock().snapshot.clone()
    }

    /// Returns the snapshot filtered by the current criteria.
    #[must_use]
    pub fn displayed(&self) -> Vec<LogEntry> {
        let state = self.inner.lock();
        state.filter.apply(&state.snapshot)
    }

    /// Returns the snapshot filtered by `filter`, leaving the current criteria untouched.
    #[must_use]
    pub fn matching(&self, filter: &LogFilter) -> Vec<LogEntry> {
        filter.apply(&self.inner.lock().snapshot)
    }

    /// Returns the current criteria.
    #[must_use]
    pub fn filter(&self) -> LogFilter {
        self.inner.lock().filter.clone()
    }

    /// Replaces the search term.
    pub fn set_search_term(&self, search_term: impl Into<String>) {
        self.inner.lock().filter.search_term = search_term.into();
    }

    /// Replaces the status criterion.
    pub fn set_status_filter(&self, status: StatusFilter) {
        self.inner.lock().filter.status = status;
    }

    /// Number of refreshes that replaced the snapshot.
    #[must_use]
    pub fn applied_refreshes(&self) -> u64 {
        self.inner.lock().applied_refreshes
    }

    /// Number of refreshes ignored because the snapshot was unchanged.
    #[must_use]
    pub fn ignored_refreshes(&self) -> u64 {
        self.inner.lock().ignored_refreshes
    }

    /// Exports the currently displayed rows.
    pub fn export_displayed(&self) -> AppResult<ExportArtifact> {
        let filter = self.filter();
        self.export_matching(&filter)
    }

    /// Exports the rows matching `filter`.
    ///
    /// A rendering failure raises an error notification; the log is never
    /// touched by an export.
    pub fn export_matching(&self, filter: &LogFilter) -> AppResult<ExportArtifact> {
        let entries = self.matching(filter);

        match export_entries(self.inner.exporter.as_ref(), &entries) {
            Ok(artifact) => {
                debug!(
                    row_count = entries.len(),
                    byte_count = artifact.bytes.len(),
                    "log export rendered"
                );
                Ok(artifact)
            }
            Err(error) => {
                warn!(error = %error, row_count = entries.len(), "log export failed");
                self.inner
                    .notifications
                    .notify_error("Failed to export logs");
                Err(error)
            }
        }
    }

    /// Returns the pretty-printed dataset payload for `value`, or `value`
    /// itself when the dataset has none.
    #[must_use]
    pub fn payload_text(&self, value: &str) -> String {
        self.inner
            .dataset
            .lookup(value)
            .and_then(|payload| serde_json::to_string_pretty(&payload).ok())
            .unwrap_or_else(|| value.to_owned())
    }
}

impl std::fmt::Debug for LogViewer {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LogViewer")
            .field("filter", &self.filter())
            .finish_non_exhaustive()
    }
}
