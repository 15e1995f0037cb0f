//! Seed helpers shared across the route tests.

use chrono::Utc;
use db::models::{attendance_code, attendance_event, class, homework_submission, user};
use sea_orm::DatabaseConnection;

pub async fn seed_class(db: &DatabaseConnection, name: &str, start_time: &str) -> class::Model {
    class::Model::create(db, name, Some(1), start_time)
        .await
        .unwrap()
}

pub async fn seed_student(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    class_id: Option<i64>,
) -> user::Model {
    user::Model::create(db, name, email, "student", Some(1), class_id)
        .await
        .unwrap()
}

pub async fn seed_code(db: &DatabaseConnection, student_id: i64) -> attendance_code::Model {
    attendance_code::Model::issue_or_fetch(db, student_id)
        .await
        .unwrap()
        .code
}

pub async fn seed_event(db: &DatabaseConnection, student_id: i64) -> attendance_event::Model {
    let code = seed_code(db, student_id).await;
    attendance_event::Model::record(db, &code, Utc::now(), 0)
        .await
        .unwrap()
}

/// A student with one attendance event and one pending submission.
pub async fn seed_pending_submission(
    db: &DatabaseConnection,
    email: &str,
) -> (user::Model, homework_submission::Model) {
    let student = seed_student(db, "Student", email, None).await;
    let event = seed_event(db, student.id).await;
    let submission = homework_submission::Model::create_with_images(
        db,
        student.id,
        event.id,
        event.academy_id,
        &["aGVsbG8=".to_string()],
    )
    .await
    .unwrap();
    (student, submission)
}
