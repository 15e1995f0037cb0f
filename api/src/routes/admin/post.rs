use axum::{Json, extract::State, http::StatusCode};
use chrono::Duration;
use db::models::attendance_code;
use util::config;

use super::common::{CleanupResponse, ReconcileRequest, ReconcileResponse};
use crate::response::ApiResponse;
use crate::services::sweep;
use crate::state::AppState;

/// POST /api/admin/reconcile
///
/// Runs one reconciliation sweep immediately. The body may override the
/// configured cutoff and retry budget; an empty body uses the defaults.
pub async fn reconcile(
    State(app_state): State<AppState>,
    body: Option<Json<ReconcileRequest>>,
) -> (StatusCode, Json<ApiResponse<ReconcileResponse>>) {
    let Json(req) = body.unwrap_or_default();
    let older_than =
        Duration::minutes(req.older_than_minutes.unwrap_or(config::sweep_older_than_minutes()));
    let max_retries = req.max_retries.unwrap_or(config::sweep_max_retries());

    let grader = app_state.grader();
    match sweep::sweep(app_state.db(), grader.as_ref(), older_than, max_retries).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ReconcileResponse::new(summary, app_state.code_collisions()),
                "Reconciliation sweep complete",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "reconciliation sweep failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Reconciliation sweep failed")),
            )
        }
    }
}

/// POST /api/admin/attendance-codes/cleanup
///
/// Deactivates active codes whose student no longer exists in the
/// registry. Historical attendance events keep the dead code value.
pub async fn cleanup_attendance_codes(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<CleanupResponse>>) {
    match attendance_code::Model::deactivate_orphans(app_state.db()).await {
        Ok(deactivated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                CleanupResponse { deactivated },
                "Orphaned attendance codes deactivated",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "attendance code cleanup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Attendance code cleanup failed")),
            )
        }
    }
}
