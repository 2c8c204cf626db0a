//! DTOs for reading stored link sets.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{LinkSet, LinkState, SetStatus};

/// A stored set with one entry per distinct link.
#[derive(Debug, Serialize)]
pub struct LinkSetResponse {
    pub id: i64,
    pub status: SetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Links as submitted, duplicates included.
    pub links: Vec<String>,
    pub results: Vec<LinkResultItem>,
}

#[derive(Debug, Serialize)]
pub struct LinkResultItem {
    pub url: String,
    pub state: LinkState,
    pub label: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<LinkSet> for LinkSetResponse {
    fn from(set: LinkSet) -> Self {
        let results = set
            .distinct_links()
            .into_iter()
            .map(|url| match set.results.get(&url) {
                Some(result) => LinkResultItem {
                    url,
                    state: result.state,
                    label: result.state.label(),
                    checked_at: result.checked_at,
                    detail: Some(result.detail.clone()).filter(|d| !d.is_empty()),
                },
                None => LinkResultItem {
                    url,
                    state: LinkState::Unknown,
                    label: LinkState::Unknown.label(),
                    checked_at: None,
                    detail: None,
                },
            })
            .collect();

        Self {
            id: set.id,
            status: set.status,
            created_at: set.created_at,
            updated_at: set.updated_at,
            links: set.links,
            results,
        }
    }
}
