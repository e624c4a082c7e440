// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-file implementation of [`BlacklistStore`].
//!
//! Writes go whole-file-then-rename so a crash mid-write never leaves a
//! truncated blacklist behind. The rename stays on the same filesystem
//! because the temp file lives next to the target.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use loadcast_core::error::LoadcastError;
use loadcast_core::traits::BlacklistStore;

/// File-backed blacklist set store.
///
/// The full set is cached in memory; `entries()` never touches the disk
/// after `open()`. `add()` updates the cache and persists atomically.
pub struct JsonBlacklistStore {
    path: PathBuf,
    cache: RwLock<BTreeSet<String>>,
}

impl JsonBlacklistStore {
    /// Opens the store, creating parent directories as needed.
    ///
    /// A missing file is an empty set. A malformed file is treated as empty
    /// with a warning rather than refusing to start; the next `add()`
    /// rewrites it whole.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, LoadcastError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| LoadcastError::Storage { source: Box::new(e) })?;
            }
        }

        let entries = read_entries(&path).await?;
        debug!(path = %path.display(), count = entries.len(), "auto-blacklist loaded");

        Ok(Self {
            path,
            cache: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_entries(path: &Path) -> Result<BTreeSet<String>, LoadcastError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(LoadcastError::Storage { source: Box::new(e) }),
    };

    match serde_json::from_slice::<Vec<String>>(&raw) {
        Ok(list) => Ok(list.into_iter().collect()),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "auto-blacklist file is malformed, starting from an empty set"
            );
            Ok(BTreeSet::new())
        }
    }
}

async fn persist(path: &Path, entries: &BTreeSet<String>) -> Result<(), LoadcastError> {
    let list: Vec<&String> = entries.iter().collect();
    let body = serde_json::to_vec_pretty(&list)
        .map_err(|e| LoadcastError::Storage { source: Box::new(e) })?;

    // Whole-file write to a sibling temp file, then rename over the target.
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &body)
        .await
        .map_err(|e| LoadcastError::Storage { source: Box::new(e) })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| LoadcastError::Storage { source: Box::new(e) })?;

    Ok(())
}

#[async_trait]
impl BlacklistStore for JsonBlacklistStore {
    async fn entries(&self) -> Result<HashSet<String>, LoadcastError> {
        Ok(self.cache.read().await.iter().cloned().collect())
    }

    async fn add(&self, entries: &[String]) -> Result<(), LoadcastError> {
        let mut cache = self.cache.write().await;

        let mut changed = false;
        for entry in entries {
            if entry.is_empty() {
                continue;
            }
            changed |= cache.insert(entry.clone());
        }

        if changed {
            persist(&self.path, &cache).await?;
            debug!(count = cache.len(), "auto-blacklist persisted");
        }

        Ok(())
    }
}
