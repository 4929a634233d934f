//! Redis-backed log storage.

use async_trait::async_trait;
use redis::AsyncCommands;
use validash_application::LogStorage;
use validash_core::{AppError, AppResult};

/// Redis implementation of the log storage port.
///
/// Each storage key maps to one string value at `<prefix>:<key>`.
#[derive(Clone)]
pub struct RedisLogStorage {
    client: redis::Client,
    key_prefix: String,
}

impl RedisLogStorage {
    /// Creates a storage adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}:{key}", self.key_prefix)
    }
}

#[async_trait]
impl LogStorage for RedisLogStorage {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

        connection
            .get(self.key_for(key))
            .await
            .map_err(|error| AppError::Internal(format!("failed to read redis log blob: {error}")))
    }

    async fn save(&self, key: &str, blob: String) -> AppResult<()> {
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

        connection
            .set(self.key_for(key), blob)
            .await
            .map_err(|error| AppError::Internal(format!("failed to write redis log blob: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use super::RedisLogStorage;

    #[test]
    fn keys_are_namespaced_by_prefix() {
        let client = redis::Client::open("redis://127.0.0.1:6379");
        assert!(client.is_ok());
        let storage = RedisLogStorage::new(
            client.unwrap_or_else(|_| unreachable!()),
            "validash:logs",
        );

        assert_eq!(storage.key_for("apiLogs"), "validash:logs:apiLogs");
    }
}
