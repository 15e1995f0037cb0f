use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use db::models::{attendance_event, grading_result, homework_submission};
use util::config;

use super::common::{GradeParams, MAX_IMAGE_BYTES, SubmissionResponse, SubmitHomeworkRequest};
use crate::response::ApiResponse;
use crate::services::grading::{self, GradingError};
use crate::state::AppState;

/// POST /api/homework/submissions
///
/// Stores a pending submission gated on a prior attendance event. The
/// submission and its images commit atomically; a stored submission is
/// never missing images.
pub async fn submit_homework(
    State(app_state): State<AppState>,
    Json(req): Json<SubmitHomeworkRequest>,
) -> (StatusCode, Json<ApiResponse<SubmissionResponse>>) {
    let db = app_state.db();

    if req.images.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("At least one image is required")),
        );
    }
    for (index, image) in req.images.iter().enumerate() {
        if image.len() > MAX_IMAGE_BYTES {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!(
                    "Image {} exceeds the {} byte limit",
                    index, MAX_IMAGE_BYTES
                ))),
            );
        }
    }

    let event = match attendance_event::Model::find_by_id(db, req.attendance_event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Attendance event not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to look up attendance event");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to store submission")),
            );
        }
    };
    if event.student_id != req.student_id {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(
                "Attendance event belongs to a different student",
            )),
        );
    }

    match homework_submission::Model::create_with_images(
        db,
        req.student_id,
        req.attendance_event_id,
        event.academy_id,
        &req.images,
    )
    .await
    {
        Ok(submission) => {
            let submission_id = submission.id;
            if config::grade_on_submit() {
                let db = app_state.db_clone();
                let grader = app_state.grader();
                tokio::spawn(async move {
                    if let Err(e) =
                        grading::dispatch(&db, grader.as_ref(), submission_id, false).await
                    {
                        tracing::warn!(submission_id, error = %e, "background grading failed");
                    }
                });
            }
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    SubmissionResponse::from_model(submission),
                    "Submission stored",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store submission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to store submission")),
            )
        }
    }
}

/// POST /api/homework/submissions/{submission_id}/grade
///
/// Runs one grading attempt right now. Already-graded submissions are a
/// no-op unless `?force=true`. External failures still return the error
/// to the caller, but the submission has already been marked `failed`.
pub async fn grade_submission(
    State(app_state): State<AppState>,
    Path(submission_id): Path<i64>,
    Query(params): Query<GradeParams>,
) -> (StatusCode, Json<ApiResponse<SubmissionResponse>>) {
    let db = app_state.db();
    let grader = app_state.grader();

    match grading::dispatch(db, grader.as_ref(), submission_id, params.force).await {
        Ok(submission) => {
            let grading = match grading_result::Model::for_submission(db, submission.id).await {
                Ok(grading) => grading,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load grading result");
                    None
                }
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    SubmissionResponse::with_grading(submission, grading),
                    "Grading complete",
                )),
            )
        }
        Err(GradingError::SubmissionNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Submission not found")),
        ),
        Err(GradingError::Db(e)) => {
            tracing::error!(error = %e, "grading dispatch hit a database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Grading failed")),
            )
        }
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}
