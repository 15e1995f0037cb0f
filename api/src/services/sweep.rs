//! Reconciliation sweep for stuck submissions.
//!
//! Submissions can get stranded in `pending` (a dispatch crashed mid-way)
//! or `failed` (the grading service was down). The sweep re-drives them
//! through the normal dispatcher, one at a time, so the external service
//! is never hammered by a burst of retries.

use chrono::{Duration, Utc};
use db::models::homework_submission;
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

use super::gemini::GradingBackend;
use super::grading::{self, GradingError};

#[derive(Debug, Default, Clone, Serialize)]
pub struct SweepSummary {
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// Finds and re-drives stuck submissions: `pending` rows older than
/// `older_than`, plus `failed` rows still under the `max_retries` budget.
///
/// Grading failures are absorbed into the summary; only database errors
/// abort the sweep.
pub async fn sweep(
    db: &DatabaseConnection,
    grader: &dyn GradingBackend,
    older_than: Duration,
    max_retries: i32,
) -> Result<SweepSummary, DbErr> {
    let stuck =
        homework_submission::Model::find_stuck(db, older_than, max_retries, Utc::now()).await?;

    let mut summary = SweepSummary::default();
    for submission in stuck {
        summary.processed += 1;
        match grading::dispatch(db, grader, submission.id, false).await {
            Ok(_) => summary.succeeded += 1,
            Err(GradingError::Db(e)) => return Err(e),
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(submission_id = submission.id, error = %e, "sweep retry failed");
            }
        }
    }

    if summary.processed > 0 {
        tracing::info!(
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "reconciliation sweep finished"
        );
    }
    Ok(summary)
}
