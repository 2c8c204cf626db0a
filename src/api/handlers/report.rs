//! Handler for PDF reports.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::report::ReportRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Renders the requested sets into a PDF document.
///
/// # Endpoint
///
/// `POST /api/report`
///
/// # Request Body
///
/// ```json
/// { "links_list": [1, 2] }
/// ```
///
/// # Response
///
/// `application/pdf`, one section per set in the requested order.
///
/// # Errors
///
/// Returns 400 Bad Request if the list is empty or malformed.
/// Returns 404 Not Found if any id is missing; no partial report is produced.
pub async fn report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    render_report(&state, payload).await
}

pub(crate) async fn render_report(
    state: &AppState,
    payload: ReportRequest,
) -> Result<Response, AppError> {
    payload.validate()?;

    let pdf = state.report_service.build_pdf(&payload.links_list).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"links-report.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response())
}
