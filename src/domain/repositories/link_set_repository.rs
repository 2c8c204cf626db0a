//! Repository trait for durable link set storage.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::entities::{LinkResult, LinkSet};

/// Errors returned by [`LinkSetRepository`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no links submitted")]
    EmptyInput,

    #[error("link set {0} not found")]
    NotFound(i64),

    #[error("link set {id} does not contain {url}")]
    UnknownLink { id: i64, url: String },

    #[error("failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Repository interface for link sets and their per-link results.
///
/// # Durability
///
/// Every mutation must be committed atomically: a reader observes either the
/// previous or the new version of a record, never a mixture.
///
/// # Concurrency
///
/// [`update_link_result`](Self::update_link_result) is a read-modify-write of
/// the whole set and must be serialized per set id so concurrent updates from
/// the submission path and the workers are never lost.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileSetRepository`] - JSON files with atomic rename
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkSetRepository: Send + Sync {
    /// Creates a set with the next id and no results.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyInput`] if `links` is empty.
    /// Returns [`StoreError::Persistence`] if the counter or the record cannot be written.
    async fn create_set(&self, links: Vec<String>) -> Result<LinkSet, StoreError>;

    /// Loads a set by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record exists for `id`.
    async fn get_set(&self, id: i64) -> Result<LinkSet, StoreError>;

    /// Stores `result` for `url` and recomputes the set status.
    ///
    /// A link that already has a terminal result keeps it. Returns the result
    /// stored for `url` after the call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the set does not exist.
    /// Returns [`StoreError::UnknownLink`] if `url` is not part of the set.
    async fn update_link_result(
        &self,
        id: i64,
        url: &str,
        result: LinkResult,
    ) -> Result<LinkResult, StoreError>;

    /// Returns every set whose status is not `done`, in no particular order.
    async fn list_unfinished(&self) -> Result<Vec<LinkSet>, StoreError>;

    /// Loads several sets, preserving the order of `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the first missing id; no partial
    /// list is returned.
    async fn list_sets(&self, ids: &[i64]) -> Result<Vec<LinkSet>, StoreError>;

    /// Checks that the storage backend is usable.
    async fn health_check(&self) -> bool;
}
