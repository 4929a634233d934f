use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use validash_core::RequestId;
use validash_domain::{HttpMethod, LogEntry, LogStatus, StatusFilter};

use super::{
    EXPORT_COLUMNS, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME, LogFilter, LogViewer,
    build_export_table, export_entries, filter_entries,
};
use crate::test_support::{
    CountingDataset, FailingExporter, FakeChangeSignal, FakeLogStorage, TextExporter,
    build_log_store,
};
use crate::{LogStore, NotificationConfig, NotificationPhase, NotificationService};

fn entry(millis: i64, status: LogStatus, endpoint: &str, key: &str) -> LogEntry {
    let captured_at = Utc.timestamp_millis_opt(millis).single().unwrap_or_default();
    LogEntry::record(
        captured_at,
        HttpMethod::Get,
        status,
        endpoint,
        key,
        RequestId::new(),
    )
}

fn sample_entries() -> Vec<LogEntry> {
    vec![
        entry(4, LogStatus::Pending, "/api/images/generate", "4567891234567"),
        entry(3, LogStatus::Error, "/api/images/generate", "9876543210987"),
        entry(2, LogStatus::Error, "/api/chat/completions", "1234567891013"),
        entry(1, LogStatus::Success, "/api/validate", "1234567891012"),
    ]
}

async fn mount_viewer(
    store: &LogStore,
    failing_export: bool,
) -> (LogViewer, NotificationService) {
    let notifications = NotificationService::new(NotificationConfig::default());
    let exporter: Arc<dyn crate::SpreadsheetExporter> = if failing_export {
        Arc::new(FailingExporter)
    } else {
        Arc::new(TextExporter)
    };
    let viewer = LogViewer::mount(
        store,
        exporter,
        Arc::new(CountingDataset::with_sample_keys()),
        notifications.clone(),
    )
    .await;

    (viewer, notifications)
}

#[test]
fn search_is_case_insensitive_substring_of_endpoint() {
    let entries = sample_entries();

    let images = filter_entries(&entries, "IMAGES", StatusFilter::All);
    assert_eq!(images.len(), 2);
    assert!(
        images
            .iter()
            .all(|entry| entry.endpoint() == "/api/images/generate")
    );

    let none = filter_entries(&entries, "billing", StatusFilter::All);
    assert!(none.is_empty());
}

#[test]
fn status_filter_combines_with_search() {
    let entries = sample_entries();

    let errors = filter_entries(&entries, "", StatusFilter::Only(LogStatus::Error));
    assert_eq!(errors.len(), 2);

    let image_errors = filter_entries(&entries, "images", StatusFilter::Only(LogStatus::Error));
    assert_eq!(image_errors.len(), 1);
    assert_eq!(image_errors[0].value(), "9876543210987");
}

#[test]
fn empty_filter_keeps_everything_in_order() {
    let entries = sample_entries();
    assert_eq!(LogFilter::default().apply(&entries), entries);
}

#[test]
fn export_table_has_fixed_columns_and_one_row_per_entry() {
    let entries = sample_entries();
    let table = build_export_table(&filter_entries(&entries, "", StatusFilter::All));

    assert_eq!(table.headers(), EXPORT_COLUMNS.as_slice());
    assert_eq!(
        table.headers(),
        ["Domain ID", "Model", "Status", "Endpoint", "Time", "State", "Value"].as_slice()
    );
    assert_eq!(table.rows().len(), entries.len());

    let states: Vec<&str> = table.rows().iter().map(|row| row[5].as_str()).collect();
    assert_eq!(states, vec!["In Progress", "Failed", "Failed", "Completed"]);
    assert_eq!(table.rows()[3][0], "dom_1");
    assert_eq!(table.rows()[3][2], "success");
    assert_eq!(table.rows()[3][6], "1234567891012");
}

#[test]
fn export_artifact_carries_workbook_metadata() {
    let artifact = export_entries(&TextExporter, &sample_entries());
    assert!(artifact.is_ok());
    let artifact = artifact.unwrap_or_else(|_| unreachable!());

    assert_eq!(artifact.file_name, EXPORT_FILE_NAME);
    assert_eq!(artifact.content_type, EXPORT_CONTENT_TYPE);
    let text = String::from_utf8(artifact.bytes).unwrap_or_default();
    assert!(text.starts_with("Domain ID\tModel\tStatus"));
    assert_eq!(text.lines().count(), 5);
}

#[tokio::test]
async fn viewer_follows_store_and_ignores_unchanged_snapshots() {
    let signal = Arc::new(FakeChangeSignal::default());
    let store = build_log_store(Arc::new(FakeLogStorage::default()), signal);
    let (viewer, _notifications) = mount_viewer(&store, false).await;
    let watcher = store.watch_signal();

    assert!(
        store
            .append(entry(1, LogStatus::Success, "/api/validate", "1234567891012"))
            .await
            .is_ok()
    );

    for _ in 0..50 {
        if viewer.ignored_refreshes() >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    watcher.abort();

    assert_eq!(viewer.displayed().len(), 1);
    assert_eq!(viewer.applied_refreshes(), 1);
    // Mount read of the empty log plus the signal echo of the append.
    assert_eq!(viewer.ignored_refreshes(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_mount_read_does_not_overwrite_newer_append() {
    let storage = Arc::new(FakeLogStorage::default());
    let store = build_log_store(storage.clone(), Arc::new(FakeChangeSignal::default()));
    assert!(
        store
            .append(entry(1, LogStatus::Success, "/api/validate", "1234567891012"))
            .await
            .is_ok()
    );

    storage.stall_next_load.store(true, Ordering::SeqCst);
    let writer = store.clone();
    let append = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        writer
            .append(entry(2, LogStatus::Error, "/api/validate", "000"))
            .await
    });
    let (viewer, _notifications) = mount_viewer(&store, false).await;
    assert!(matches!(append.await, Ok(Ok(()))));

    assert_eq!(viewer.snapshot().len(), 2);
    assert_eq!(viewer.snapshot(), store.read_all().await);
}

#[tokio::test]
async fn viewer_applies_current_filter() {
    let store = build_log_store(
        Arc::new(FakeLogStorage::default()),
        Arc::new(FakeChangeSignal::default()),
    );
    for entry in sample_entries().into_iter().rev() {
        assert!(store.append(entry).await.is_ok());
    }
    let (viewer, _notifications) = mount_viewer(&store, false).await;
    assert_eq!(viewer.displayed().len(), 4);

    viewer.set_search_term("Generate");
    assert_eq!(viewer.displayed().len(), 2);

    viewer.set_status_filter(StatusFilter::Only(LogStatus::Pending));
    assert_eq!(viewer.displayed().len(), 1);
    assert_eq!(
        viewer.filter(),
        LogFilter::new("Generate", StatusFilter::Only(LogStatus::Pending))
    );

    let artifact = viewer.export_displayed();
    assert!(artifact.is_ok());
    let text = String::from_utf8(artifact.unwrap_or_else(|_| unreachable!()).bytes)
        .unwrap_or_default();
    assert_eq!(text.lines().count(), 2);

    assert_eq!(viewer.matching(&LogFilter::default()).len(), 4);
}

#[tokio::test]
async fn failed_export_notifies_and_leaves_log_untouched() {
    let store = build_log_store(
        Arc::new(FakeLogStorage::default()),
        Arc::new(FakeChangeSignal::default()),
    );
    assert!(
        store
            .append(entry(1, LogStatus::Error, "/api/validate", "000"))
            .await
            .is_ok()
    );
    let (viewer, notifications) = mount_viewer(&store, true).await;

    assert!(viewer.export_displayed().is_err());

    let visible = notifications.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].phase, NotificationPhase::Error);
    assert_eq!(store.read_all().await.len(), 1);
}

#[tokio::test]
async fn payload_text_prefers_dataset_payload() {
    let store = build_log_store(
        Arc::new(FakeLogStorage::default()),
        Arc::new(FakeChangeSignal::default()),
    );
    let (viewer, _notifications) = mount_viewer(&store, false).await;

    let known = viewer.payload_text("1234567891012");
    assert!(known.contains("\"name\": \"Sample Record\""));
    assert!(known.contains('\n'));

    assert_eq!(viewer.payload_text("000"), "000");
}

fn arb_status() -> impl Strategy<Value = LogStatus> {
    prop_oneof![
        Just(LogStatus::Success),
        Just(LogStatus::Error),
        Just(LogStatus::Pending),
    ]
}

fn arb_filter() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        arb_status().prop_map(StatusFilter::Only),
    ]
}

fn arb_entries() -> impl Strategy<Value = Vec<LogEntry>> {
    prop::collection::vec(
        (
            0_i64..1_000_000,
            arb_status(),
            prop::sample::select(vec![
                "/api/validate",
                "/api/users",
                "/API/Chat/Completions",
                "/api/images/generate",
            ]),
        ),
        0..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(millis, status, endpoint)| entry(millis, status, endpoint, "1234567891012"))
            .collect()
    })
}

proptest! {
    #[test]
    fn filtering_is_idempotent(
        entries in arb_entries(),
        search in "[a-zA-Z/]{0,6}",
        status in arb_filter(),
    ) {
        let once = filter_entries(&entries, search.as_str(), status);
        let twice = filter_entries(&once, search.as_str(), status);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unfiltered_export_has_one_row_per_entry(entries in arb_entries()) {
        let table = build_export_table(&filter_entries(&entries, "", StatusFilter::All));
        prop_assert_eq!(table.rows().len(), entries.len());
    }
}
