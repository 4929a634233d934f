use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use validash_application::LogStorage;
use validash_core::AppResult;

/// Process-local log storage, lost on restart.
#[derive(Default)]
pub struct InMemoryLogStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryLogStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogStorage for InMemoryLogStorage {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, blob: String) -> AppResult<()> {
        self.blobs.write().await.insert(key.to_owned(), blob);
        Ok(())
    }
}
