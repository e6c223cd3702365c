//! Task endpoints, including status changes and history.

use crate::http::{
    auth::CurrentUser,
    dto::{
        HistoryEntryResponse, StatusChangeBody, TaskBody, TaskListParams, TaskListResponse,
        TaskPatchBody, TaskResponse,
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};
use crate::task::domain::TaskId;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

/// `GET /tasks`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TaskListParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let query = params.into_query()?;
    let page = state.tasks.list(&query).await?;
    Ok(Json(TaskListResponse {
        items: page.items.iter().map(TaskResponse::from).collect(),
        total: page.total,
        limit: query.limit,
        offset: query.offset,
    }))
}

/// `GET /tasks/{id}`
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TaskId>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.tasks.get(id).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// `POST /tasks`
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(body): ApiJson<TaskBody>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.tasks.create(user.actor(), body.into()).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// `PATCH /tasks/{id}`
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<TaskId>,
    ApiJson(body): ApiJson<TaskPatchBody>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.tasks.update(user.actor(), id, body.into()).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// `DELETE /tasks/{id}`
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<TaskId>,
) -> Result<StatusCode, ApiError> {
    state.tasks.delete(user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /tasks/{id}/status`
pub async fn change_status(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<TaskId>,
    ApiJson(body): ApiJson<StatusChangeBody>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .tasks
        .change_status(user.actor(), id, &body.to_status)
        .await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// `GET /tasks/{id}/history`
pub async fn history(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<TaskId>,
) -> Result<Json<Vec<HistoryEntryResponse>>, ApiError> {
    let entries = state.tasks.history(user.actor(), id).await?;
    Ok(Json(entries.iter().map(HistoryEntryResponse::from).collect()))
}
