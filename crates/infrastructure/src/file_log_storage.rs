//! Log storage persisting one JSON file per storage key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use validash_application::LogStorage;
use validash_core::{AppError, AppResult};

/// Stores each blob at `<directory>/<key>.json`.
///
/// Writes go to a sibling temporary file first and are renamed into place, so
/// a crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileLogStorage {
    directory: PathBuf,
}

impl FileLogStorage {
    /// Creates storage rooted at `directory`, which is created on first save.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let is_plain_name = !key.is_empty()
            && key
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || "_-.".contains(character))
            && !key.starts_with('.');
        if !is_plain_name {
            return Err(AppError::Validation(format!(
                "storage key '{key}' is not a valid file name"
            )));
        }

        Ok(self.directory.join(format!("{key}.json")))
    }
}

#[async_trait]
impl LogStorage for FileLogStorage {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read log file '{}': {error}",
                path.display()
            ))),
        }
    }

    async fn save(&self, key: &str, blob: String) -> AppResult<()> {
        let path = self.path_for(key)?;
        let staging_path = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to create log directory '{}': {error}",
                    self.directory.display()
                ))
            })?;
        tokio::fs::write(&staging_path, blob.as_bytes())
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write log file '{}': {error}",
                    staging_path.display()
                ))
            })?;
        tokio::fs::rename(&staging_path, &path)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to replace log file '{}': {error}",
                    path.display()
                ))
            })?;

        debug!(path = %path.display(), bytes = blob.len(), "log file written");
        Ok(())
    }
}
