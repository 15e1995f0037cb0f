use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{grading_result, homework_image, homework_submission};

use super::common::{ImageListResponse, SubmissionResponse};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/homework/submissions/{submission_id}
///
/// Returns the submission with its grading result attached once graded.
pub async fn get_submission(
    State(app_state): State<AppState>,
    Path(submission_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<SubmissionResponse>>) {
    let db = app_state.db();

    let submission = match homework_submission::Model::find_by_id(db, submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Submission not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load submission");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to load submission")),
            );
        }
    };

    match grading_result::Model::for_submission(db, submission_id).await {
        Ok(grading) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SubmissionResponse::with_grading(submission, grading),
                "Submission retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to load grading result");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to load submission")),
            )
        }
    }
}

/// GET /api/homework/submissions/{submission_id}/images
///
/// Returns the submission's images in their original upload order.
pub async fn get_submission_images(
    State(app_state): State<AppState>,
    Path(submission_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<ImageListResponse>>) {
    let db = app_state.db();

    match homework_submission::Model::find_by_id(db, submission_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Submission not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load submission");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to load images")),
            );
        }
    }

    match homework_image::Model::for_submission(db, submission_id).await {
        Ok(images) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ImageListResponse {
                    submission_id,
                    images: images.into_iter().map(|i| i.image_data).collect(),
                },
                "Images retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to load images");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to load images")),
            )
        }
    }
}

/// GET /api/homework/students/{student_id}/submissions
///
/// Full submission history for one student, newest first, with grading
/// results attached where they exist.
pub async fn student_submission_history(
    State(app_state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<SubmissionResponse>>>) {
    let db = app_state.db();

    let submissions = match homework_submission::Model::history_for_student(db, student_id).await {
        Ok(submissions) => submissions,
        Err(e) => {
            tracing::error!(error = %e, "failed to load submission history");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to load submission history")),
            );
        }
    };

    let mut history = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let grading = match grading_result::Model::for_submission(db, submission.id).await {
            Ok(grading) => grading,
            Err(e) => {
                tracing::error!(error = %e, "failed to load grading result");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("Failed to load submission history")),
                );
            }
        };
        history.push(SubmissionResponse::with_grading(submission, grading));
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(history, "Submission history retrieved")),
    )
}
