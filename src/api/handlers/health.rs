//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Storage**: Data directory is reachable
/// 2. **Job Queue**: Workers are not stopping; reports queue depth
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Data directory reachable" },
///     "job_queue": { "status": "ok", "message": "Queued: 0 / 1000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage_check = check_storage(&state).await;

    let queue_check = check_job_queue(&state);

    let all_healthy = storage_check.status == "ok" && queue_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage: storage_check,
            job_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    if state.link_service.storage_ready().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some("Data directory reachable".to_string()),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Data directory unavailable".to_string()),
        }
    }
}

fn check_job_queue(state: &AppState) -> CheckStatus {
    let manager = &state.job_manager;

    if manager.is_stopping() {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Workers are stopping".to_string()),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!(
                "Queued: {} / {}",
                manager.queued(),
                manager.queue_capacity()
            )),
        }
    }
}
