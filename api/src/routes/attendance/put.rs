use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::attendance_code::{self, CodeError};

use super::common::{CodeResponse, SetActiveRequest};
use crate::response::ApiResponse;
use crate::state::AppState;

/// PUT /api/attendance/codes/{code}/active
///
/// Activates or deactivates a code without deleting it, so the same code
/// value can be re-enabled later.
pub async fn set_code_active(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> (StatusCode, Json<ApiResponse<CodeResponse>>) {
    match attendance_code::Model::set_active_by_code(app_state.db(), &code, req.is_active).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(updated.into(), "Attendance code updated")),
        ),
        Err(CodeError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Attendance code not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to update attendance code");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update attendance code")),
            )
        }
    }
}
