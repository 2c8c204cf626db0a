//! Application layer services implementing business logic.
//!
//! Services consume the repository and probe traits and give HTTP handlers
//! and the admin CLI a small API that returns [`crate::error::AppError`].
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Set submission with an immediate check, set lookup
//! - [`services::report_service::ReportService`] - PDF reports over stored sets

pub mod services;
