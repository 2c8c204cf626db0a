//! Link set aggregate: a batch of URLs submitted together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::link_result::LinkResult;

/// Aggregate completion status of a link set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetStatus {
    Processing,
    Done,
}

/// Outcome of applying a result to a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result was stored.
    Applied,
    /// The link already had a terminal result, which was kept.
    KeptTerminal,
}

/// A batch of URLs tracked as one unit.
///
/// `links` keeps the submission order and may contain duplicates; `results`
/// is keyed by URL, so duplicate entries share a single result.
///
/// `status` is derived: it is recomputed from `links` and `results` whenever
/// the set is mutated or loaded, and is never trusted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSet {
    pub id: i64,
    pub links: Vec<String>,
    #[serde(default)]
    pub results: BTreeMap<String, LinkResult>,
    pub status: SetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkSet {
    /// Creates a fresh set with no results.
    pub fn new(id: i64, links: Vec<String>, now: DateTime<Utc>) -> Self {
        let mut set = Self {
            id,
            links,
            results: BTreeMap::new(),
            status: SetStatus::Processing,
            created_at: now,
            updated_at: now,
        };
        set.recompute_status();
        set
    }

    pub fn is_done(&self) -> bool {
        self.status == SetStatus::Done
    }

    pub fn contains_link(&self, url: &str) -> bool {
        self.links.iter().any(|l| l == url)
    }

    /// Distinct URLs in submission order.
    pub fn distinct_links(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.links
            .iter()
            .filter(|l| seen.insert(*l))
            .cloned()
            .collect()
    }

    /// Distinct URLs whose result is absent or not terminal.
    pub fn unresolved_links(&self) -> Vec<String> {
        self.distinct_links()
            .into_iter()
            .filter(|url| !self.results.get(url).is_some_and(LinkResult::is_terminal))
            .collect()
    }

    /// Stores `result` for `url` and recomputes the status.
    ///
    /// A terminal result is final: any later result for the same URL is
    /// ignored and the stored one is kept.
    pub fn apply_result(&mut self, url: &str, result: LinkResult, now: DateTime<Utc>) -> ApplyOutcome {
        if self.results.get(url).is_some_and(LinkResult::is_terminal) {
            return ApplyOutcome::KeptTerminal;
        }

        self.results.insert(url.to_string(), result);
        self.updated_at = now;
        self.recompute_status();
        ApplyOutcome::Applied
    }

    /// Derives `status` from the links/results relationship.
    pub fn recompute_status(&mut self) {
        let all_terminal = self
            .links
            .iter()
            .all(|url| self.results.get(url).is_some_and(LinkResult::is_terminal));

        self.status = if all_terminal {
            SetStatus::Done
        } else {
            SetStatus::Processing
        };
    }
}
