//! Theme catalogue endpoints.

use crate::http::{
    auth::CurrentUser,
    dto::{PageParams, ThemeBody, ThemePatchBody, ThemeResponse},
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};
use crate::theme::domain::ThemeId;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

const DEFAULT_PAGE_SIZE: usize = 100;

/// `GET /themes`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<Vec<ThemeResponse>>, ApiError> {
    let themes = state
        .themes
        .list(
            page.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            page.offset.unwrap_or_default(),
        )
        .await?;
    Ok(Json(themes.iter().map(ThemeResponse::from).collect()))
}

/// `GET /themes/{id}`
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ThemeId>,
) -> Result<Json<ThemeResponse>, ApiError> {
    let theme = state.themes.get(id).await?;
    Ok(Json(ThemeResponse::from(&theme)))
}

/// `POST /themes`
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(body): ApiJson<ThemeBody>,
) -> Result<Json<ThemeResponse>, ApiError> {
    let theme = state.themes.create(user.actor(), body.into()).await?;
    Ok(Json(ThemeResponse::from(&theme)))
}

/// `PATCH /themes/{id}`
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<ThemeId>,
    ApiJson(body): ApiJson<ThemePatchBody>,
) -> Result<Json<ThemeResponse>, ApiError> {
    let theme = state.themes.update(user.actor(), id, body.into()).await?;
    Ok(Json(ThemeResponse::from(&theme)))
}

/// `DELETE /themes/{id}`
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<ThemeId>,
) -> Result<StatusCode, ApiError> {
    state.themes.delete(user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
