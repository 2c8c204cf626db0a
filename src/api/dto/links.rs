//! DTOs for link set submission.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Request to verify a batch of links.
///
/// Links are stored as submitted; duplicates are allowed and share one result.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinksRequest {
    #[validate(length(min = 1, message = "At least one link is required"))]
    pub links: Vec<String>,
}

/// Result of the immediate check, keyed by submitted URL.
#[derive(Debug, Serialize)]
pub struct CreateLinksResponse {
    /// `"available"` or `"not available"` per URL.
    pub links: BTreeMap<String, String>,
    /// Id of the stored set, usable in report requests.
    pub links_num: i64,
}
