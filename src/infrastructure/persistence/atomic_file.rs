//! Crash-safe file replacement.
//!
//! New contents are written to a temporary sibling (`<name>.tmp`), flushed to
//! disk, and then renamed over the canonical path. The rename is the commit
//! point: a crash before it leaves the canonical file untouched, a crash after
//! it leaves the new version in place.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Suffix of staged files that have not been committed yet.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Returns the temporary sibling used while replacing `target`.
pub fn temp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(TEMP_SUFFIX);
    target.with_file_name(name)
}

/// Returns true if `path` looks like an uncommitted staged file.
pub fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEMP_SUFFIX))
}

/// Contents written next to the target but not yet visible there.
#[derive(Debug)]
#[must_use = "a staged write is invisible until committed"]
pub struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    /// Atomically replaces the target with the staged contents.
    pub async fn commit(self) -> io::Result<()> {
        fs::rename(&self.temp, &self.target).await?;
        sync_parent_dir(&self.target).await;
        Ok(())
    }

    /// Removes the staged file without touching the target.
    pub async fn discard(self) -> io::Result<()> {
        match fs::remove_file(&self.temp).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp
    }
}

/// Writes `bytes` to the temporary sibling of `target` and flushes it.
pub async fn stage(target: &Path, bytes: &[u8]) -> io::Result<StagedFile> {
    let temp = temp_path(target);

    let mut file = fs::File::create(&temp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;

    Ok(StagedFile {
        temp,
        target: target.to_path_buf(),
    })
}

/// Replaces `target` with `bytes` atomically.
pub async fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    stage(target, bytes).await?.commit().await
}

#[cfg(unix)]
async fn sync_parent_dir(path: &Path) {
    // Best effort: persist the directory entry created by the rename.
    if let Some(parent) = path.parent()
        && let Ok(dir) = fs::File::open(parent).await
        && let Err(e) = dir.sync_all().await
    {
        tracing::debug!(dir = %parent.display(), error = %e, "directory fsync failed");
    }
}

#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) {}
