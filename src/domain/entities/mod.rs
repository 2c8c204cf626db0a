//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`LinkSet`] - A batch of URLs submitted together, with its aggregate status
//! - [`LinkResult`] - The verification outcome of one URL in a set
//! - [`LinkState`] - Per-link verification state
//!
//! Entities derive Serde traits because the file store persists them as JSON
//! records as-is.

pub mod link_result;
pub mod link_set;

pub use link_result::{LinkResult, LinkState};
pub use link_set::{ApplyOutcome, LinkSet, SetStatus};
