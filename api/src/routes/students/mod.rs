//! Routes for the `/api/students` endpoint group.
//!
//! - `GET /students/{student_id}/weak-concepts` → summary, computed on miss
//! - `DELETE /students/{student_id}/weak-concepts` → drop the cached entry

use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;
use delete::clear_weak_concepts;
use get::get_weak_concepts;

pub mod common;
pub mod delete;
pub mod get;

pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/{student_id}/weak-concepts", get(get_weak_concepts))
        .route("/{student_id}/weak-concepts", delete(clear_weak_concepts))
}
