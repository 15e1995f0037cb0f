//! The grading dispatcher.
//!
//! [`dispatch`] drives one submission through a full grading attempt:
//! load images, call the external backend, then commit the outcome. Both
//! the HTTP grade trigger and the reconciliation sweep go through this
//! function, so the status rules live in exactly one place.

use db::models::grading_result::NewGradingResult;
use db::models::homework_submission::SubmissionStatus;
use db::models::{class, grading_result, homework_image, homework_submission, user, weak_concept_cache};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, TransactionTrait};
use thiserror::Error;

use super::gemini::{GradeRequest, GradingBackend};

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("Submission {0} not found")]
    SubmissionNotFound(i64),
    #[error("Submission {0} has no stored images")]
    MissingImages(i64),
    #[error("Grading service timed out")]
    Timeout,
    #[error("Grading service quota exceeded")]
    QuotaExceeded,
    #[error("Grading service returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Runs one grading attempt for `submission_id`.
///
/// Already-graded submissions are a no-op unless `force` is set. On
/// success the result row, the `graded` status and the weak-concept cache
/// invalidation commit atomically; a submission is therefore never
/// `graded` without its result row. On an external failure the submission
/// moves to `failed` with its attempt counter bumped, and the error is
/// returned to the caller. A `graded` submission never moves backwards,
/// even if a concurrent attempt fails after it completed.
pub async fn dispatch(
    db: &DatabaseConnection,
    grader: &dyn GradingBackend,
    submission_id: i64,
    force: bool,
) -> Result<homework_submission::Model, GradingError> {
    let submission = homework_submission::Model::find_by_id(db, submission_id)
        .await?
        .ok_or(GradingError::SubmissionNotFound(submission_id))?;

    if submission.status == SubmissionStatus::Graded && !force {
        tracing::debug!(submission_id, "already graded; skipping dispatch");
        return Ok(submission);
    }

    let images = homework_image::Model::for_submission(db, submission_id).await?;
    if images.is_empty() {
        homework_submission::Model::bump_attempts(db, submission_id).await?;
        homework_submission::Model::transition(
            db,
            submission_id,
            SubmissionStatus::Failed,
            &[SubmissionStatus::Pending, SubmissionStatus::Failed],
        )
        .await?;
        return Err(GradingError::MissingImages(submission_id));
    }

    let subject_hint = class_name_for(db, submission.student_id).await?;

    homework_submission::Model::bump_attempts(db, submission_id).await?;

    let request = GradeRequest {
        images: images.into_iter().map(|i| i.image_data).collect(),
        subject_hint,
    };

    match grader.grade(request).await {
        Ok(grade) => {
            let allow_from = if force {
                vec![
                    SubmissionStatus::Pending,
                    SubmissionStatus::Failed,
                    SubmissionStatus::Graded,
                ]
            } else {
                vec![SubmissionStatus::Pending, SubmissionStatus::Failed]
            };

            let txn = db.begin().await?;
            grading_result::Model::upsert(
                &txn,
                NewGradingResult {
                    submission_id,
                    score: grade.score,
                    subject: grade.subject,
                    feedback: grade.feedback,
                    strengths: grade.strengths,
                    suggestions: grade.suggestions,
                    correct_answers: grade.correct_answers,
                    total_questions: grade.total_questions,
                    graded_by: grader.name().to_string(),
                },
            )
            .await?;
            let moved = homework_submission::Model::transition(
                &txn,
                submission_id,
                SubmissionStatus::Graded,
                &allow_from,
            )
            .await?;
            weak_concept_cache::Model::invalidate(&txn, submission.student_id).await?;
            txn.commit().await?;

            if !moved {
                // A concurrent dispatch got there first; its result row was
                // just overwritten by ours, which is fine.
                tracing::debug!(submission_id, "lost grading race; result overwritten");
            }
            tracing::info!(submission_id, score = grade.score, "submission graded");

            homework_submission::Model::find_by_id(db, submission_id)
                .await?
                .ok_or(GradingError::SubmissionNotFound(submission_id))
        }
        Err(e) => {
            homework_submission::Model::transition(
                db,
                submission_id,
                SubmissionStatus::Failed,
                &[SubmissionStatus::Pending, SubmissionStatus::Failed],
            )
            .await?;
            tracing::warn!(submission_id, error = %e, "grading attempt failed");
            Err(e)
        }
    }
}

/// Subject hint for the grading prompt: the name of the student's class,
/// when they have one.
async fn class_name_for(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Option<String>, DbErr> {
    let Some(student) = user::Model::find_by_id(db, student_id).await? else {
        return Ok(None);
    };
    let Some(class_id) = student.class_id else {
        return Ok(None);
    };
    Ok(class::Entity::find_by_id(class_id)
        .one(db)
        .await?
        .map(|c| c.name))
}
