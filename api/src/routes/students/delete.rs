use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::response::ApiResponse;
use crate::services::weak_concepts;
use crate::state::AppState;

/// DELETE /api/students/{student_id}/weak-concepts
///
/// Drops the cached summary. Deleting a missing entry still succeeds; the
/// next GET recomputes either way.
pub async fn clear_weak_concepts(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    match weak_concepts::invalidate(app_state.db(), student_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                serde_json::json!({ "student_id": student_id }),
                "Weak-concept cache cleared",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to clear weak-concept cache");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to clear weak-concept cache")),
            )
        }
    }
}
