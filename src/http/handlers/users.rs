//! Profile of the authenticated user.

use crate::http::{
    auth::CurrentUser,
    dto::{ProfileBody, UserResponse},
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};
use axum::Json;
use axum::extract::State;

/// `PATCH /users/me`
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<ProfileBody>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = state.accounts.update_profile(user.id(), body.into()).await?;
    Ok(Json(UserResponse::from(&updated)))
}
