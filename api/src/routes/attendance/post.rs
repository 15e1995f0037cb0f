use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use db::models::attendance_code::{self, CodeError};
use db::models::attendance_event::{self, EventError};
use db::models::user;
use util::config;

use super::common::{AttendanceEventResponse, CheckInRequest, CodeResponse, IssueCodeRequest};
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/attendance/codes
///
/// Issues a persistent attendance code for a student, or returns the one
/// they already have. Collision counts from the draw loop are folded into
/// the shared counter for the admin reconcile report.
pub async fn issue_code(
    State(app_state): State<AppState>,
    Json(req): Json<IssueCodeRequest>,
) -> (StatusCode, Json<ApiResponse<CodeResponse>>) {
    let db = app_state.db();

    match user::Model::exists(db, req.student_id).await {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to look up student");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to issue attendance code")),
            );
        }
    }

    match attendance_code::Model::issue_or_fetch(db, req.student_id).await {
        Ok(issued) => {
            app_state.record_code_collisions(issued.collisions);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    issued.code.into(),
                    "Attendance code issued",
                )),
            )
        }
        Err(CodeError::GenerationExhausted(attempts)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!(
                "Could not generate a unique code within {} attempts",
                attempts
            ))),
        ),
        Err(e) => {
            tracing::error!(error = %e, "attendance code issuance failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to issue attendance code")),
            )
        }
    }
}

/// POST /api/attendance/check-in
///
/// Validates a presented code and appends an attendance event. Unknown
/// codes return 404 and deactivated ones 403, so a client can tell the
/// two cases apart.
pub async fn check_in(
    State(app_state): State<AppState>,
    Json(req): Json<CheckInRequest>,
) -> (StatusCode, Json<ApiResponse<AttendanceEventResponse>>) {
    let db = app_state.db();

    let code = match attendance_code::Model::validate(db, &req.code).await {
        Ok(code) => code,
        Err(CodeError::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Attendance code not found")),
            );
        }
        Err(CodeError::Inactive) => {
            return (
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Attendance code is deactivated")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "attendance code validation failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Check-in failed")),
            );
        }
    };

    match attendance_event::Model::record(db, &code, Utc::now(), config::checkin_cooldown_seconds())
        .await
    {
        Ok(event) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(event.into(), "Checked in")),
        ),
        Err(EventError::StudentNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        ),
        Err(EventError::DuplicateWindow(seconds)) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error(format!(
                "Already checked in within the last {} seconds",
                seconds
            ))),
        ),
        Err(e) => {
            tracing::error!(error = %e, "check-in failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Check-in failed")),
            )
        }
    }
}
