//! Durable, append-only activity log shared by every view.
//!
//! The whole log lives as one JSON array under a single storage key, most
//! recent entry first. Appends persist the full sequence, notify local
//! subscribers directly and then publish a change signal so other contexts
//! sharing the storage re-read it.
//!
//! Every subscriber delivery happens under the append lock, so handlers see
//! snapshots in the order they were persisted.

use std::sync::{Arc, Weak};

use tokio::sync::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use validash_core::{AppError, AppResult, NonEmptyString};
use validash_domain::LogEntry;

mod ports;
mod subscription;


pub use ports::{ChangeSignal, LogStorage, StorageChanged};
pub use subscription::{LogChangeHandler, LogSubscription};

use subscription::SubscriberRegistry;

/// Default storage key of the persisted log.
const DEFAULT_STORAGE_KEY: &str = "apiLogs";

/// Configuration for a log store.
#[derive(Debug, Clone)]
pub struct LogStoreConfig {
    storage_key: String,
}

impl LogStoreConfig {
    /// Creates a configuration persisting under `storage_key`.
    pub fn new(storage_key: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            storage_key: NonEmptyString::new(storage_key)?.into(),
        })
    }

    /// Returns the storage key.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        self.storage_key.as_str()
    }
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

struct LogStoreInner {
    storage: Arc<dyn LogStorage>,
    signal: Arc<dyn ChangeSignal>,
    config: LogStoreConfig,
    append_lock: Mutex<()>,
    subscribers: Arc<SubscriberRegistry>,
}

/// Application service owning the persisted log and its subscriber list.
#[derive(Clone)]
pub struct LogStore {
    inner: Arc<LogStoreInner>,
}

impl LogStore {
    /// Creates a log store over a storage backend and a change signal.
    #[must_use]
    pub fn new(
        storage: Arc<dyn LogStorage>,
        signal: Arc<dyn ChangeSignal>,
        config: LogStoreConfig,
    ) -> Self {
        Self {
            inner: Arc::new(LogStoreInner {
                storage,
                signal,
                config,
                append_lock: Mutex::new(()),
                subscribers: Arc::new(SubscriberRegistry::default()),
            }),
        }
    }

    /// Returns the key the log is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        self.inner.config.storage_key()
    }

    /// Returns the number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Writes `entry` at the head of the persisted log.
    ///
    /// Appends from the same process are serialized. Local subscribers are
    /// notified before the append lock is released, then the change signal is
    /// published. A corrupt blob is replaced; a failing storage read aborts
    /// the append so the existing log is not overwritten.
    pub async fn append(&self, entry: LogEntry) -> AppResult<()> {
        {
            let _guard = self.inner.append_lock.lock().await;

            let mut entries = self.load_entries().await?;
            entries.insert(0, entry);

            let blob = serde_json::to_string(&entries).map_err(|error| {
                AppError::Internal(format!("failed to serialize log entries: {error}"))
            })?;
            self.inner.storage.save(self.storage_key(), blob).await?;

            debug!(
                storage_key = self.storage_key(),
                entry_count = entries.len(),
                "log entry appended"
            );
            self.inner.subscribers.notify(&entries);
        }

        self.inner.signal.publish(StorageChanged {
            storage_key: self.storage_key().to_owned(),
        });

        Ok(())
    }

    /// Returns all entries, most recent first.
    ///
    /// Never fails: an absent, unreadable or corrupt blob reads as an empty log.
    pub async fn read_all(&self) -> Vec<LogEntry> {
        match self.load_entries().await {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    storage_key = self.storage_key(),
                    error = %error,
                    "failed to read log storage, treating log as empty"
                );
                Vec::new()
            }
        }
    }

    /// Registers `handler` for every subsequent change of the log.
    pub fn subscribe<H>(&self, handler: H) -> LogSubscription
    where
        H: LogChangeHandler + 'static,
    {
        self.inner.subscribers.register(Arc::new(handler))
    }

    /// Registers `handler` and hands it the current log before any later change.
    ///
    /// Registration and the initial read happen under the append lock, so a
    /// concurrent append is delivered after the initial snapshot, never before.
    pub async fn subscribe_with_snapshot<H>(&self, handler: H) -> LogSubscription
    where
        H: LogChangeHandler + 'static,
    {
        let handler: Arc<dyn LogChangeHandler> = Arc::new(handler);
        let _guard = self.inner.append_lock.lock().await;

        let subscription = self.inner.subscribers.register(handler.clone());
        let entries = self.read_all().await;
        handler.on_change(&entries);

        subscription
    }

    /// Spawns the task turning change signals into subscriber notifications.
    ///
    /// Signals carry no entries, so every relevant signal triggers a full
    /// re-read. A lagged receiver still triggers a single refresh. The task
    /// ends when the signal closes or the store is dropped.
    pub fn watch_signal(&self) -> JoinHandle<()> {
        let mut receiver = self.inner.signal.subscribe();
        let weak_inner: Weak<LogStoreInner> = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            loop {
                let refresh = match receiver.recv().await {
                    Ok(change) => Some(change.storage_key),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "log change signal lagged");
                        None
                    }
                    Err(RecvError::Closed) => break,
                };

                let Some(inner) = weak_inner.upgrade() else {
                    break;
                };
                let store = LogStore { inner };
                if refresh.is_some_and(|storage_key| storage_key != store.storage_key()) {
                    continue;
                }

                let _guard = store.inner.append_lock.lock().await;
                let entries = store.read_all().await;
                store.inner.subscribers.notify(&entries);
            }
        })
    }

    async fn load_entries(&self) -> AppResult<Vec<LogEntry>> {
        let Some(blob) = self.inner.storage.load(self.storage_key()).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<LogEntry>>(blob.as_str()) {
            Ok(entries) => Ok(entries),
            Err(error) => {
                warn!(
                    storage_key = self.storage_key(),
                    error = %error,
                    "persisted log is corrupt, treating log as empty"
                );
                Ok(Vec::new())
            }
        }
    }
}
