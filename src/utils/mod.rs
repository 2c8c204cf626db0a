//! Utility functions shared across the application.
//!
//! - [`url_normalizer`] - Link input normalization and probe candidates

pub mod url_normalizer;
