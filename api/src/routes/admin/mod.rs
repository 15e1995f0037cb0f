//! Routes for the `/api/admin` endpoint group.
//!
//! - `POST /admin/reconcile` → run the reconciliation sweep now
//! - `POST /admin/attendance-codes/cleanup` → deactivate orphaned codes

use axum::{Router, routing::post};

use crate::state::AppState;
use post::{cleanup_attendance_codes, reconcile};

pub mod common;
pub mod post;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/reconcile", post(reconcile))
        .route("/attendance-codes/cleanup", post(cleanup_attendance_codes))
}
