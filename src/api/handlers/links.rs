//! Handlers for link set submission.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::links::{CreateLinksRequest, CreateLinksResponse};
use crate::api::dto::submit::SubmitRequest;
use crate::api::handlers::report::render_report;
use crate::error::AppError;
use crate::state::AppState;

/// Stores a batch of links, checks each once and queues the set.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "links": ["http://link1.com", "http://link2.com"] }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "links": {
///     "http://link1.com": "available",
///     "http://link2.com": "not available"
///   },
///   "links_num": 1
/// }
/// ```
///
/// The set id is queued for background verification after the immediate
/// check, so links left unresolved (store hiccup, restart) still converge.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed, empty or too large.
pub async fn create_links_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinksRequest>, JsonRejection>,
) -> Result<Json<CreateLinksResponse>, AppError> {
    let Json(payload) = payload?;
    create_links(&state, payload).await.map(Json)
}

/// Combined entry point accepting either a link batch or a report request.
///
/// # Endpoint
///
/// `POST /`
///
/// - `{"links": [...]}` behaves like `POST /api/links`
/// - `{"links_list": [...]}` behaves like `POST /api/report`
///
/// # Errors
///
/// Returns 400 Bad Request if the body matches neither shape.
pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;

    match payload {
        SubmitRequest::Links(request) => {
            let response = create_links(&state, request).await?;
            Ok(Json(response).into_response())
        }
        SubmitRequest::Report(request) => render_report(&state, request).await,
    }
}

async fn create_links(
    state: &AppState,
    payload: CreateLinksRequest,
) -> Result<CreateLinksResponse, AppError> {
    payload.validate()?;

    let (id, links) = state.link_service.create_and_verify(payload.links).await?;
    state.job_manager.enqueue(id);

    Ok(CreateLinksResponse {
        links,
        links_num: id,
    })
}
