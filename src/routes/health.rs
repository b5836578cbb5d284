// ============================================================================
// Health Route
// ============================================================================
//
// Endpoints:
// - GET /health - liveness probe, answered locally
//
// ============================================================================

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// GET /health
/// Liveness probe; does not consult the upstreams.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
