//! Durable storage for the credential pair.
//!
//! One well-known file holds the serialized pair; its absence means "no
//! session". Every write happens inside the store operation that mutates the
//! in-memory session, so a restart always resumes from the last committed
//! state or from empty.

use explanner_model::CredentialPair;
use std::path::PathBuf;

use super::errors::StorageError;

pub(crate) const SESSION_FILE: &str = "session.json";

/// File-backed persistence for the session's credential pair.
#[derive(Debug)]
pub struct SessionStorage {
    cache_path: PathBuf,
}

impl SessionStorage {
    pub fn new() -> Result<Self, StorageError> {
        let proj_dirs = directories::ProjectDirs::from("", "explanner", "explanner-client")
            .ok_or_else(|| {
                StorageError::InitFailed("unable to determine data directory".to_string())
            })?;
        Ok(Self {
            cache_path: proj_dirs.data_dir().join(SESSION_FILE),
        })
    }

    /// Storage rooted at an explicit path, for tests.
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self { cache_path }
    }

    pub async fn load(&self) -> Result<Option<CredentialPair>, StorageError> {
        if !self.cache_path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&self.cache_path)
            .await
            .map_err(StorageError::ReadFailed)?;
        let pair = serde_json::from_str(&content).map_err(|e| {
            log::warn!(
                "Corrupted persisted session at {:?}: {}",
                self.cache_path,
                e
            );
            StorageError::CorruptedData
        })?;
        Ok(Some(pair))
    }

    pub async fn save(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        if let Some(parent) = self.cache_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::WriteFailed)?;
        }
        let content = serde_json::to_string_pretty(pair)
            .map_err(|e| StorageError::WriteFailed(std::io::Error::other(e)))?;
        tokio::fs::write(&self.cache_path, content)
            .await
            .map_err(StorageError::WriteFailed)?;
        log::debug!("Persisted session to {:?}", self.cache_path);
        Ok(())
    }

    /// Removes the persisted record. A no-op when nothing is persisted.
    pub async fn clear(&self) -> Result<(), StorageError> {
        if self.cache_path.exists() {
            tokio::fs::remove_file(&self.cache_path)
                .await
                .map_err(StorageError::WriteFailed)?;
            log::info!("Cleared persisted session");
        }
        Ok(())
    }

    pub fn has_persisted(&self) -> bool {
        self.cache_path.exists()
    }
}
