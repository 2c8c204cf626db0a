//! Handler for reading a stored link set.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::sets::LinkSetResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a stored set with its per-link results.
///
/// # Endpoint
///
/// `GET /api/sets/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the set does not exist.
pub async fn get_set_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LinkSetResponse>, AppError> {
    let set = state.link_service.get_set(id).await?;
    Ok(Json(set.into()))
}
