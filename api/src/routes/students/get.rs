use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::common::WeakConceptsResponse;
use crate::response::ApiResponse;
use crate::services::weak_concepts;
use crate::state::AppState;

/// GET /api/students/{student_id}/weak-concepts
///
/// Returns the cached weak-concept summary, recomputing it from the
/// grading history on a miss. A student with no graded work gets an
/// empty summary, not an error.
pub async fn get_weak_concepts(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<WeakConceptsResponse>>) {
    match weak_concepts::get_or_compute(app_state.db(), student_id).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report.into(), "Weak concepts retrieved")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to compute weak concepts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to compute weak concepts")),
            )
        }
    }
}
