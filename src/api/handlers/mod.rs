//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod report;
pub mod sets;

pub use health::health_handler;
pub use links::{create_links_handler, submit_handler};
pub use report::report_handler;
pub use sets::get_set_handler;
