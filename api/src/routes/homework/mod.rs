//! Routes for the `/api/homework` endpoint group.
//!
//! - `POST /homework/submissions` → store a submission and its images
//! - `GET /homework/submissions/{submission_id}` → submission (+ grading)
//! - `GET /homework/submissions/{submission_id}/images` → ordered images
//! - `POST /homework/submissions/{submission_id}/grade` → run grading now
//! - `GET /homework/students/{student_id}/submissions` → history

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use get::{get_submission, get_submission_images, student_submission_history};
use post::{grade_submission, submit_homework};

pub mod common;
pub mod get;
pub mod post;

pub fn homework_routes() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(submit_homework))
        .route("/submissions/{submission_id}", get(get_submission))
        .route("/submissions/{submission_id}/images", get(get_submission_images))
        .route("/submissions/{submission_id}/grade", post(grade_submission))
        .route(
            "/students/{student_id}/submissions",
            get(student_submission_history),
        )
}
