use std::sync::Arc;

use crate::application::services::{LinkService, ReportService};
use crate::domain::job_manager::JobManager;
use crate::infrastructure::persistence::FileSetRepository;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<FileSetRepository>>,
    pub report_service: Arc<ReportService<FileSetRepository>>,
    pub job_manager: Arc<JobManager<FileSetRepository>>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<FileSetRepository>>,
        report_service: Arc<ReportService<FileSetRepository>>,
        job_manager: Arc<JobManager<FileSetRepository>>,
    ) -> Self {
        Self {
            link_service,
            report_service,
            job_manager,
        }
    }
}
