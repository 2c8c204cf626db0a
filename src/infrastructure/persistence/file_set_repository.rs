//! File-backed implementation of the link set repository.
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//! ├── meta.json          {"last": <last assigned id>}
//! └── sets/
//!     ├── 1.json
//!     └── 2.json
//! ```
//!
//! Every write goes through [`atomic_file`](super::atomic_file), so a record
//! is always either the previous or the new committed version.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::atomic_file::{self, is_temp_file};
use crate::domain::entities::{ApplyOutcome, LinkResult, LinkSet};
use crate::domain::repositories::{LinkSetRepository, StoreError};

const META_FILE: &str = "meta.json";
const SETS_DIR: &str = "sets";
const RECORD_EXTENSION: &str = "json";

/// Persisted id counter.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Meta {
    last: i64,
}

/// Link set repository storing one JSON record per set.
///
/// Read-modify-write cycles are serialized per set id; id allocation is
/// serialized by the counter mutex.
pub struct FileSetRepository {
    root: PathBuf,
    sets_dir: PathBuf,
    last_id: Mutex<i64>,
    set_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl FileSetRepository {
    /// Opens (creating if needed) a store rooted at `root`.
    ///
    /// The id counter is restored from `meta.json`. If records with a higher
    /// id exist (for example after the counter file was lost), the counter
    /// resumes after the highest one so ids are never reused.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the directories cannot be created
    /// or read, and [`StoreError::Corrupt`] if `meta.json` cannot be parsed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let sets_dir = root.join(SETS_DIR);

        fs::create_dir_all(&sets_dir)
            .await
            .map_err(|e| StoreError::persistence(&sets_dir, e))?;

        let meta_path = root.join(META_FILE);
        let recorded = match fs::read(&meta_path).await {
            Ok(bytes) => {
                serde_json::from_slice::<Meta>(&bytes)
                    .map_err(|source| StoreError::Corrupt {
                        path: meta_path.clone(),
                        source,
                    })?
                    .last
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(StoreError::persistence(&meta_path, e)),
        };

        let highest = highest_record_id(&sets_dir).await?;
        if highest > recorded {
            warn!(
                recorded,
                highest, "id counter is behind stored records, resuming after highest id"
            );
        }

        let repository = Self {
            root,
            sets_dir,
            last_id: Mutex::new(recorded.max(highest)),
            set_locks: DashMap::new(),
        };

        let leftovers = repository.leftover_temp_files().await?;
        if !leftovers.is_empty() {
            warn!(
                count = leftovers.len(),
                "found uncommitted temporary files from an interrupted write"
            );
        }

        info!(
            data_dir = %repository.root.display(),
            last_id = recorded.max(highest),
            "Link set store opened"
        );

        Ok(repository)
    }

    /// Root directory of the store.
    pub fn data_dir(&self) -> &Path {
        &self.root
    }

    /// Lists `.tmp` files left behind by writes that never reached the rename.
    pub async fn leftover_temp_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut found = Vec::new();

        for dir in [&self.root, &self.sets_dir] {
            let mut entries = fs::read_dir(dir)
                .await
                .map_err(|e| StoreError::persistence(dir, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::persistence(dir, e))?
            {
                let path = entry.path();
                if is_temp_file(&path) {
                    found.push(path);
                }
            }
        }

        found.sort();
        Ok(found)
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILE)
    }

    fn set_path(&self, id: i64) -> PathBuf {
        self.sets_dir.join(format!("{id}.{RECORD_EXTENSION}"))
    }

    fn set_lock(&self, id: i64) -> Arc<Mutex<()>> {
        self.set_locks.entry(id).or_default().clone()
    }

    /// Drops the lock entry for `id` unless another update still holds it.
    fn release_set_lock(&self, id: i64) {
        self.set_locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Read-modify-write of one link result; the caller holds the set lock.
    async fn apply_link_result(
        &self,
        id: i64,
        url: &str,
        result: LinkResult,
    ) -> Result<LinkResult, StoreError> {
        let mut set = self.read_set(id).await?;
        if !set.contains_link(url) {
            return Err(StoreError::UnknownLink {
                id,
                url: url.to_string(),
            });
        }

        match set.apply_result(url, result, Utc::now()) {
            ApplyOutcome::Applied => {
                self.write_set(&set).await?;
                if set.is_done() {
                    debug!(set_id = id, "link set completed");
                }
            }
            ApplyOutcome::KeptTerminal => {
                debug!(set_id = id, url, "link already resolved, keeping stored result");
            }
        }

        set.results
            .remove(url)
            .ok_or_else(|| StoreError::UnknownLink {
                id,
                url: url.to_string(),
            })
    }

    /// Advances the counter; the new value is returned only once committed.
    async fn next_id(&self) -> Result<i64, StoreError> {
        let mut last = self.last_id.lock().await;
        let next = *last + 1;

        let path = self.meta_path();
        let bytes = serde_json::to_vec_pretty(&Meta { last: next })
            .map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;
        atomic_file::write_atomic(&path, &bytes)
            .await
            .map_err(|e| StoreError::persistence(&path, e))?;

        *last = next;
        Ok(next)
    }

    async fn read_set(&self, id: i64) -> Result<LinkSet, StoreError> {
        let path = self.set_path(id);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound(id)),
            Err(e) => return Err(StoreError::persistence(&path, e)),
        };

        let mut set: LinkSet =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt { path, source })?;
        set.recompute_status();

        Ok(set)
    }

    async fn write_set(&self, set: &LinkSet) -> Result<(), StoreError> {
        let path = self.set_path(set.id);
        let bytes = serde_json::to_vec_pretty(set).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;

        atomic_file::write_atomic(&path, &bytes)
            .await
            .map_err(|e| StoreError::persistence(&path, e))
    }
}

#[async_trait]
impl LinkSetRepository for FileSetRepository {
    async fn create_set(&self, links: Vec<String>) -> Result<LinkSet, StoreError> {
        if links.is_empty() {
            return Err(StoreError::EmptyInput);
        }

        let id = self.next_id().await?;
        let set = LinkSet::new(id, links, Utc::now());
        self.write_set(&set).await?;

        debug!(set_id = id, links = set.links.len(), "link set created");
        Ok(set)
    }

    async fn get_set(&self, id: i64) -> Result<LinkSet, StoreError> {
        self.read_set(id).await
    }

    async fn update_link_result(
        &self,
        id: i64,
        url: &str,
        result: LinkResult,
    ) -> Result<LinkResult, StoreError> {
        let lock = self.set_lock(id);
        let stored = {
            let _guard = lock.lock().await;
            self.apply_link_result(id, url, result).await
        };
        drop(lock);
        self.release_set_lock(id);

        stored
    }

    async fn list_unfinished(&self) -> Result<Vec<LinkSet>, StoreError> {
        let mut unfinished = Vec::new();

        for id in record_ids(&self.sets_dir).await? {
            match self.read_set(id).await {
                Ok(set) if !set.is_done() => unfinished.push(set),
                Ok(_) => {}
                Err(e) => warn!(set_id = id, error = %e, "skipping unreadable link set"),
            }
        }

        Ok(unfinished)
    }

    async fn list_sets(&self, ids: &[i64]) -> Result<Vec<LinkSet>, StoreError> {
        let mut sets = Vec::with_capacity(ids.len());
        for &id in ids {
            sets.push(self.read_set(id).await?);
        }
        Ok(sets)
    }

    async fn health_check(&self) -> bool {
        fs::metadata(&self.sets_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

/// Ids of committed set records in `dir`; temporary files are ignored.
async fn record_ids(dir: &Path) -> Result<Vec<i64>, StoreError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| StoreError::persistence(dir, e))?;
    let mut ids = Vec::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StoreError::persistence(dir, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
            continue;
        }
        if let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<i64>().ok())
        {
            ids.push(id);
        }
    }

    ids.sort_unstable();
    Ok(ids)
}

async fn highest_record_id(dir: &Path) -> Result<i64, StoreError> {
    Ok(record_ids(dir).await?.last().copied().unwrap_or(0))
}
