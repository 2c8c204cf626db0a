//! Link set submission and retrieval service.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::domain::entities::{LinkSet, LinkState};
use crate::domain::probe::LinkProbe;
use crate::domain::repositories::LinkSetRepository;
use crate::domain::verification::record_outcome;
use crate::error::AppError;

/// Per-link labels returned to the submitter, keyed by URL.
pub type Availability = BTreeMap<String, String>;

/// Service for creating link sets and reading them back.
///
/// Submission runs one immediate check of every link so the caller gets an
/// answer right away; durable convergence is left to the
/// [`JobManager`](crate::domain::job_manager::JobManager), which the caller
/// triggers afterwards.
pub struct LinkService<R: LinkSetRepository + 'static> {
    repository: Arc<R>,
    probe: Arc<dyn LinkProbe>,
    max_links: usize,
}

impl<R: LinkSetRepository + 'static> LinkService<R> {
    /// Creates a new link service.
    pub fn new(repository: Arc<R>, probe: Arc<dyn LinkProbe>, max_links: usize) -> Self {
        Self {
            repository,
            probe,
            max_links,
        }
    }

    /// Persists a new set and checks each distinct link once, concurrently.
    ///
    /// Returns the new set id and an `"available"` / `"not available"` label
    /// for every submitted URL. When a result cannot be stored the label
    /// still reflects the probe; the link stays unresolved in the store until
    /// a worker picks the set up.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `links` is empty
    /// - `links` has more entries than the configured maximum
    /// - an entry is blank
    ///
    /// Returns [`AppError::Internal`] if the set cannot be created.
    pub async fn create_and_verify(
        &self,
        links: Vec<String>,
    ) -> Result<(i64, Availability), AppError> {
        self.validate_links(&links)?;

        let set = self.repository.create_set(links).await?;
        info!(set_id = set.id, links = set.links.len(), "Link set created");

        let mut tasks = JoinSet::new();
        for url in set.distinct_links() {
            let repository = self.repository.clone();
            let probe = self.probe.clone();
            let set_id = set.id;

            tasks.spawn(async move {
                let outcome = probe.probe(&url).await;
                let reachable = outcome.reachable;

                let state = match record_outcome(repository.as_ref(), set_id, &url, outcome).await
                {
                    Ok(stored) => stored.state,
                    Err(_) if reachable => LinkState::Available,
                    Err(_) => LinkState::NotAvailable,
                };
                (url, state)
            });
        }

        let mut availability = Availability::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, state)) => {
                    availability.insert(url, state.label().to_string());
                }
                Err(e) => error!(set_id = set.id, error = %e, "link check task failed"),
            }
        }

        for url in &set.links {
            availability
                .entry(url.clone())
                .or_insert_with(|| LinkState::NotAvailable.label().to_string());
        }

        Ok((set.id, availability))
    }

    /// Loads several sets in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if any id is missing; no partial list is returned.
    pub async fn fetch_sets(&self, ids: &[i64]) -> Result<Vec<LinkSet>, AppError> {
        Ok(self.repository.list_sets(ids).await?)
    }

    /// Loads one set with its per-link results.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the set does not exist.
    pub async fn get_set(&self, id: i64) -> Result<LinkSet, AppError> {
        Ok(self.repository.get_set(id).await?)
    }

    pub async fn storage_ready(&self) -> bool {
        self.repository.health_check().await
    }

    fn validate_links(&self, links: &[String]) -> Result<(), AppError> {
        if links.is_empty() {
            return Err(AppError::bad_request("No links submitted", json!({})));
        }

        if links.len() > self.max_links {
            return Err(AppError::bad_request(
                "Too many links in one submission",
                json!({ "max": self.max_links, "got": links.len() }),
            ));
        }

        if let Some(index) = links.iter().position(|l| l.trim().is_empty()) {
            return Err(AppError::bad_request(
                "Link must not be blank",
                json!({ "index": index }),
            ));
        }

        Ok(())
    }
}
