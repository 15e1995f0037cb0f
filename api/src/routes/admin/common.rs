use serde::{Deserialize, Serialize};

use crate::services::sweep::SweepSummary;

/// Optional overrides for one sweep run; config defaults apply otherwise.
#[derive(Deserialize, Default)]
pub struct ReconcileRequest {
    pub older_than_minutes: Option<i64>,
    pub max_retries: Option<i32>,
}

#[derive(Serialize, Default)]
pub struct ReconcileResponse {
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Lifetime count of attendance-code candidate collisions, as an
    /// early signal that the 6-digit code space is filling up.
    pub code_collisions: u64,
}

impl ReconcileResponse {
    pub fn new(summary: SweepSummary, code_collisions: u64) -> Self {
        Self {
            processed: summary.processed,
            succeeded: summary.succeeded,
            failed: summary.failed,
            code_collisions,
        }
    }
}

#[derive(Serialize, Default)]
pub struct CleanupResponse {
    pub deactivated: u64,
}
