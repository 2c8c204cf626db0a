//! # Link Checker
//!
//! A service that checks whether batches of URLs are reachable and keeps the
//! results durably on disk, built with Axum and Tokio.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link sets, storage and probe traits, worker pool
//! - **Application Layer** ([`application`]) - Submission and report services
//! - **Infrastructure Layer** ([`infrastructure`]) - File store, HTTP probe, PDF rendering
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Immediate concurrent check of every submitted link
//! - Crash-safe JSON records written with temp file + rename
//! - Unfinished sets re-queued automatically at startup
//! - Bounded job queue drained by a fixed worker pool
//! - PDF reports over one or more stored sets
//!
//! ## Quick Start
//!
//! ```bash
//! export DATA_DIR="./data"   # Optional
//!
//! cargo run
//!
//! curl -X POST localhost:8080/api/links -d '{"links":["wikipedia.org"]}' \
//!      -H 'content-type: application/json'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, ReportService};
    pub use crate::domain::entities::{LinkResult, LinkSet, LinkState, SetStatus};
    pub use crate::domain::job_manager::{JobManager, WorkerPoolConfig};
    pub use crate::domain::probe::{LinkProbe, ProbeOutcome};
    pub use crate::domain::repositories::{LinkSetRepository, StoreError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::FileSetRepository;
    pub use crate::state::AppState;
}
