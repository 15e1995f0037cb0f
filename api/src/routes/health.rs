use axum::{Json, Router, http::StatusCode, routing::get};
use chrono::Utc;

use crate::response::ApiResponse;
use crate::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET /api/health
///
/// Liveness probe. Does not touch the database.
async fn health() -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    });
    (
        StatusCode::OK,
        Json(ApiResponse::success(body, "Service is healthy")),
    )
}
