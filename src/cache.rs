// src/cache.rs
//! Disk-backed store of assembled documents.
//!
//! One JSON file per page, named by the page's 32-hex id and holding the
//! full [`DocumentRecord`]. Reads are best-effort: a missing, unreadable or
//! corrupt entry is a miss, never an error.

use crate::constants::CACHE_DIR_NAME;
use crate::error::AppError;
use crate::model::DocumentRecord;
use crate::types::DocumentId;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct DocumentCache {
    cache_dir: PathBuf,
}

impl DocumentCache {
    /// Opens (creating if needed) a cache rooted at `cache_dir`.
    pub async fn open(cache_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let cache_dir = cache_dir.into();
        tokio::fs::create_dir_all(&cache_dir).await?;
        log::debug!("Document cache at {}", cache_dir.display());
        Ok(Self { cache_dir })
    }

    /// `$XDG_CACHE_HOME/notion-importer`, or `~/.cache/notion-importer`.
    pub fn default_cache_dir() -> PathBuf {
        std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".cache")
            })
            .join(CACHE_DIR_NAME)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the stored record for `id`, if there is a readable one.
    pub async fn get(&self, id: &DocumentId) -> Option<DocumentRecord> {
        let path = self.entry_path(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Cache miss for {}", id);
                return None;
            }
            Err(e) => {
                log::warn!("Could not read cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<DocumentRecord>(&content) {
            Ok(record) if &record.id == id => {
                log::debug!("Cache hit for {}", id);
                Some(record)
            }
            Ok(record) => {
                log::warn!(
                    "Cache entry {} holds document {}; ignoring it",
                    path.display(),
                    record.id
                );
                None
            }
            Err(e) => {
                log::warn!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Replaces the stored record for `id`.
    ///
    /// The record is written to a temporary file in the cache directory and
    /// renamed into place, so readers see either the old or the new entry.
    pub async fn put(&self, id: &DocumentId, record: &DocumentRecord) -> Result<(), AppError> {
        let json = serde_json::to_string(record)?;
        let path = self.entry_path(id);
        let temp_path = self.cache_dir.join(format!(
            "{}.{}.tmp",
            id.as_str(),
            uuid::Uuid::new_v4().simple()
        ));

        let written = match tokio::fs::write(&temp_path, json).await {
            Ok(()) => tokio::fs::rename(&temp_path, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        log::debug!("Cached document {} at {}", id, path.display());
        Ok(())
    }

    fn entry_path(&self, id: &DocumentId) -> PathBuf {
        self.cache_dir.join(format!("{}.json", id.as_str()))
    }
}
