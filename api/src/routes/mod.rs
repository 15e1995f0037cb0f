//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe
//! - `/attendance` → code issuance and check-in
//! - `/homework` → submission intake, retrieval and grading trigger
//! - `/students` → per-student weak-concept summaries
//! - `/admin` → reconciliation sweep and code cleanup

use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod attendance;
pub mod health;
pub mod homework;
pub mod students;

/// Builds the complete application router, with `AppState` already applied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/attendance", attendance::attendance_routes())
        .nest("/homework", homework::homework_routes())
        .nest("/students", students::students_routes())
        .nest("/admin", admin::admin_routes())
        .with_state(app_state)
}
