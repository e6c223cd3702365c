//! Aggregated task statistics.

use crate::http::{dto::SummaryResponse, error::ApiError, state::AppState};
use axum::Json;
use axum::extract::State;

/// `GET /analytics/summary`
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = state.analytics.summary().await?;
    Ok(Json(summary.into()))
}
