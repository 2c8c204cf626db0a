//! Single-link verification shared by the submission path and the workers.

use chrono::Utc;
use tracing::{debug, error};

use crate::domain::entities::LinkResult;
use crate::domain::probe::{LinkProbe, ProbeOutcome};
use crate::domain::repositories::{LinkSetRepository, StoreError};

/// Probes `url` and persists the terminal result into set `set_id`.
///
/// Returns the result stored for the link afterwards, which is the earlier
/// terminal result if another actor resolved the link first.
///
/// # Errors
///
/// Returns the store error if the terminal result cannot be persisted. The
/// probe itself never fails.
pub async fn probe_and_record<R>(
    repository: &R,
    probe: &dyn LinkProbe,
    set_id: i64,
    url: &str,
) -> Result<LinkResult, StoreError>
where
    R: LinkSetRepository + ?Sized,
{
    let outcome = probe.probe(url).await;
    record_outcome(repository, set_id, url, outcome).await
}

/// Persists a finished probe as the terminal result of `url`.
///
/// # Errors
///
/// Returns the store error if the result cannot be persisted.
pub async fn record_outcome<R>(
    repository: &R,
    set_id: i64,
    url: &str,
    outcome: ProbeOutcome,
) -> Result<LinkResult, StoreError>
where
    R: LinkSetRepository + ?Sized,
{
    debug!(set_id, url, reachable = outcome.reachable, detail = %outcome.detail, "probe finished");

    let label = if outcome.reachable {
        "available"
    } else {
        "not_available"
    };
    metrics::counter!("link_probes_total", "outcome" => label).increment(1);

    let result = LinkResult::from_probe(url, outcome, Utc::now());
    repository
        .update_link_result(set_id, url, result)
        .await
        .inspect_err(|e| error!(set_id, url, error = %e, "failed to store link result"))
}
