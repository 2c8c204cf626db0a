//! API route configuration.

use crate::api::handlers::{create_links_handler, get_set_handler, report_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /links`      - Submit a link batch and get the immediate check
/// - `POST /report`     - Render stored sets as a PDF
/// - `GET  /sets/{id}`  - Stored set with per-link results
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_links_handler))
        .route("/report", post(report_handler))
        .route("/sets/{id}", get(get_set_handler))
}
