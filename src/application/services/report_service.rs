//! PDF report generation for stored link sets.

use std::sync::Arc;

use tracing::info;

use crate::domain::repositories::LinkSetRepository;
use crate::error::AppError;
use crate::infrastructure::report::render_pdf;

/// Builds PDF reports from persisted link sets.
pub struct ReportService<R: LinkSetRepository> {
    repository: Arc<R>,
}

impl<R: LinkSetRepository> ReportService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Renders the sets named by `ids`, in that order, into one PDF.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if any id is missing.
    pub async fn build_pdf(&self, ids: &[i64]) -> Result<Vec<u8>, AppError> {
        let sets = self.repository.list_sets(ids).await?;
        let pdf = render_pdf(&sets);

        info!(sets = sets.len(), bytes = pdf.len(), "Report rendered");
        Ok(pdf)
    }
}
