use std::sync::Arc;

use tracing::info;
use validash_application::LogStorage;
use validash_core::AppError;
use validash_infrastructure::{FileLogStorage, InMemoryLogStorage, RedisLogStorage};

use crate::api_config::LogStorageConfig;

use super::redis::build_redis_client;

const REDIS_KEY_PREFIX: &str = "validash";

pub fn build_log_storage(config: &LogStorageConfig) -> Result<Arc<dyn LogStorage>, AppError> {
    let storage: Arc<dyn LogStorage> = match config {
        LogStorageConfig::Memory => {
            info!("log storage: in-memory");
            Arc::new(InMemoryLogStorage::new())
        }
        LogStorageConfig::File { directory } => {
            info!(directory = %directory.display(), "log storage: json files");
            Arc::new(FileLogStorage::new(directory.clone()))
        }
        LogStorageConfig::Redis { redis_url } => {
            info!("log storage: redis");
            Arc::new(RedisLogStorage::new(
                build_redis_client(redis_url)?,
                REDIS_KEY_PREFIX,
            ))
        }
    };

    Ok(storage)
}
