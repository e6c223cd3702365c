//! Route handlers grouped by resource.

pub mod analytics;
pub mod auth;
pub mod tasks;
pub mod themes;
pub mod users;

use super::dto::HealthResponse;
use axum::Json;

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
