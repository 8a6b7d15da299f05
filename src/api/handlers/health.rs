/*
 * Responsibility
 * - GET /health (liveness)
 * - Static response: no auth, no database
 */
use axum::{http::StatusCode, response::IntoResponse};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "Health Service is running")
}
