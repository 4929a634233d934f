use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{Mutex, broadcast};

use validash_core::{AppError, AppResult};

use crate::{
    ChangeSignal, ExportTable, LogStorage, LogStore, LogStoreConfig, SpreadsheetExporter,
    StorageChanged, ValidationDataset,
};

#[derive(Default)]
pub(crate) struct FakeLogStorage {
    pub(crate) blobs: Mutex<HashMap<String, String>>,
    pub(crate) fail_reads: AtomicBool,
    pub(crate) fail_writes: AtomicBool,
    /// Holds the next load for a while after reading the blob.
    pub(crate) stall_next_load: AtomicBool,
}

#[async_trait]
impl LogStorage for FakeLogStorage {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal("storage offline".to_owned()));
        }

        let blob = self.blobs.lock().await.get(key).cloned();
        if self.stall_next_load.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(150)).await;
        }

        Ok(blob)
    }

    async fn save(&self, key: &str, blob: String) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("storage is read-only".to_owned()));
        }

        self.blobs.lock().await.insert(key.to_owned(), blob);
        Ok(())
    }
}

pub(crate) struct FakeChangeSignal {
    sender: broadcast::Sender<StorageChanged>,
}

impl Default for FakeChangeSignal {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }
}

impl ChangeSignal for FakeChangeSignal {
    fn publish(&self, change: StorageChanged) {
        let _ = self.sender.send(change);
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChanged> {
        self.sender.subscribe()
    }
}

pub(crate) struct CountingDataset {
    payloads: HashMap<String, Value>,
    pub(crate) lookups: AtomicUsize,
}

impl CountingDataset {
    pub(crate) fn with_sample_keys() -> Self {
        Self {
            payloads: HashMap::from([
                (
                    "1234567891012".to_owned(),
                    json!({"name": "Sample Record", "status": "valid", "score": 98}),
                ),
                (
                    "1234567891004".to_owned(),
                    json!({"name": "Boundary Record", "status": "valid"}),
                ),
            ]),
            lookups: AtomicUsize::new(0),
        }
    }

    pub(crate) fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ValidationDataset for CountingDataset {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.payloads.get(key).cloned()
    }
}

/// Renders tables as tab-separated text so tests can inspect the output.
#[derive(Default)]
pub(crate) struct TextExporter;

impl SpreadsheetExporter for TextExporter {
    fn render(&self, table: &ExportTable) -> AppResult<Vec<u8>> {
        let mut lines = vec![table.headers().join("\t")];
        lines.extend(table.rows().iter().map(|row| row.join("\t")));
        Ok(lines.join("\n").into_bytes())
    }
}

#[derive(Default)]
pub(crate) struct FailingExporter;

impl SpreadsheetExporter for FailingExporter {
    fn render(&self, _table: &ExportTable) -> AppResult<Vec<u8>> {
        Err(AppError::Internal("workbook could not be written".to_owned()))
    }
}

pub(crate) fn build_log_store(
    storage: Arc<FakeLogStorage>,
    signal: Arc<FakeChangeSignal>,
) -> LogStore {
    LogStore::new(storage, signal, LogStoreConfig::default())
}
