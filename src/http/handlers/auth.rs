//! Registration, login and the current-user lookup.

use crate::http::{
    auth::CurrentUser,
    dto::{LoginBody, RegisterBody, UserResponse},
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};
use crate::identity::ports::AccessToken;
use axum::Json;
use axum::extract::State;

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterBody>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.register(body.into()).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<AccessToken>, ApiError> {
    let token = state.accounts.login(&body.email, &body.password).await?;
    Ok(Json(token))
}

/// `GET /auth/me`
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
