//! Routes for the `/api/attendance` endpoint group.
//!
//! - `POST /attendance/codes` → idempotent per-student code issuance
//! - `PUT /attendance/codes/{code}/active` → activate or deactivate a code
//! - `POST /attendance/check-in` → validate a code and append an event

use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;
use post::{check_in, issue_code};
use put::set_code_active;

pub mod common;
pub mod post;
pub mod put;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/codes", post(issue_code))
        .route("/codes/{code}/active", put(set_code_active))
        .route("/check-in", post(check_in))
}
