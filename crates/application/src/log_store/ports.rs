use async_trait::async_trait;
use tokio::sync::broadcast;

use validash_core::AppResult;

/// Storage port holding serialized log blobs under well-known keys.
#[async_trait]
pub trait LogStorage: Send + Sync {
    /// Loads the blob stored under `key`, or `None` when nothing was written yet.
    async fn load(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the blob stored under `key`.
    async fn save(&self, key: &str, blob: String) -> AppResult<()>;
}

/// Generic "storage changed" signal. Carries no entry payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChanged {
    /// Storage key whose blob was replaced.
    pub storage_key: String,
}

/// Publish/subscribe port shared by every context observing the same storage.
pub trait ChangeSignal: Send + Sync {
    /// Announces that a storage key changed.
    fn publish(&self, change: StorageChanged);

    /// Returns a receiver for subsequent announcements.
    fn subscribe(&self) -> broadcast::Receiver<StorageChanged>;
}
