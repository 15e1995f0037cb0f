//! Request/response bodies shared by the attendance handlers.

use db::models::{attendance_code, attendance_event};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct IssueCodeRequest {
    pub student_id: i64,
}

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub code: String,
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Serialize, Default)]
pub struct CodeResponse {
    pub student_id: i64,
    pub code: String,
    pub is_active: bool,
}

impl From<attendance_code::Model> for CodeResponse {
    fn from(model: attendance_code::Model) -> Self {
        Self {
            student_id: model.student_id,
            code: model.code,
            is_active: model.is_active,
        }
    }
}

#[derive(Serialize, Default)]
pub struct AttendanceEventResponse {
    pub id: i64,
    pub student_id: i64,
    pub code: String,
    pub check_in_time: String,
    pub status: String,
    pub class_id: Option<i64>,
    pub academy_id: Option<i64>,
}

impl From<attendance_event::Model> for AttendanceEventResponse {
    fn from(model: attendance_event::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            code: model.code,
            check_in_time: model.check_in_time.to_rfc3339(),
            status: model.status.to_string(),
            class_id: model.class_id,
            academy_id: model.academy_id,
        }
    }
}
