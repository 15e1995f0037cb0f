//! Request/response bodies shared by the homework handlers.

use db::models::{grading_result, homework_submission};
use serde::{Deserialize, Serialize};

/// Per-image ceiling on the base64 payload. Larger uploads are rejected
/// at intake rather than stored and failed later by the grading service.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Deserialize)]
pub struct SubmitHomeworkRequest {
    pub attendance_event_id: i64,
    pub student_id: i64,
    pub images: Vec<String>,
}

#[derive(Deserialize)]
pub struct GradeParams {
    #[serde(default)]
    pub force: bool,
}

#[derive(Serialize, Default)]
pub struct GradingResponse {
    pub score: f64,
    pub subject: Option<String>,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub suggestions: Vec<String>,
    pub correct_answers: Option<i32>,
    pub total_questions: Option<i32>,
    pub graded_by: String,
    pub graded_at: String,
}

impl From<grading_result::Model> for GradingResponse {
    fn from(model: grading_result::Model) -> Self {
        let strengths = model.strengths_list();
        let suggestions = model.suggestions_list();
        Self {
            score: model.score,
            subject: model.subject,
            feedback: model.feedback,
            strengths,
            suggestions,
            correct_answers: model.correct_answers,
            total_questions: model.total_questions,
            graded_by: model.graded_by,
            graded_at: model.graded_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Default)]
pub struct SubmissionResponse {
    pub id: i64,
    pub student_id: i64,
    pub attendance_event_id: i64,
    pub image_count: i32,
    pub submitted_at: String,
    pub status: String,
    pub attempts: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading: Option<GradingResponse>,
}

impl SubmissionResponse {
    pub fn from_model(model: homework_submission::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            attendance_event_id: model.attendance_event_id,
            image_count: model.image_count,
            submitted_at: model.submitted_at.to_rfc3339(),
            status: model.status.to_string(),
            attempts: model.attempts,
            grading: None,
        }
    }

    pub fn with_grading(
        model: homework_submission::Model,
        grading: Option<grading_result::Model>,
    ) -> Self {
        let mut response = Self::from_model(model);
        response.grading = grading.map(GradingResponse::from);
        response
    }
}

#[derive(Serialize, Default)]
pub struct ImageListResponse {
    pub submission_id: i64,
    pub images: Vec<String>,
}
