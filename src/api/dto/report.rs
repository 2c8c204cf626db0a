//! DTOs for PDF report generation.

use serde::Deserialize;
use validator::Validate;

/// Request to render stored sets into one PDF.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    /// Set ids, rendered in this order.
    #[validate(length(min = 1, message = "At least one set id is required"))]
    pub links_list: Vec<i64>,
}
