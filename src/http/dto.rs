//! Request and response bodies.

use super::error::ApiError;
use crate::analytics::domain::AnalyticsSummary;
use crate::identity::{
    domain::{User, UserId},
    services::{RegisterRequest, UpdateProfileRequest},
};
use crate::task::{
    domain::{
        HistoryEntryId, Priority, SortField, SortOrder, StatusHistoryEntry, Task, TaskFilter,
        TaskId, TaskQuery, TaskStatus,
    },
    services::{TaskDraft, TaskUpdate},
};
use crate::theme::{
    domain::{Theme, ThemeId},
    services::{ThemeChanges, ThemeDraft},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(body: RegisterBody) -> Self {
        Self::new(body.email, body.username, body.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileBody {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl From<ProfileBody> for UpdateProfileRequest {
    fn from(body: ProfileBody) -> Self {
        let mut request = Self::new();
        if let Some(email) = body.email {
            request = request.with_email(email);
        }
        if let Some(username) = body.username {
            request = request.with_username(username);
        }
        if let Some(password) = body.password {
            request = request.with_password(password);
        }
        request
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().as_str().to_owned(),
            username: user.username().as_str().to_owned(),
            is_admin: user.is_admin(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeBody {
    pub name: String,
    pub description: Option<String>,
}

impl From<ThemeBody> for ThemeDraft {
    fn from(body: ThemeBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ThemePatchBody {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<ThemePatchBody> for ThemeChanges {
    fn from(body: ThemePatchBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub id: ThemeId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Theme> for ThemeResponse {
    fn from(theme: &Theme) -> Self {
        Self {
            id: theme.id(),
            name: theme.name().as_str().to_owned(),
            description: theme.description().map(str::to_owned),
            created_at: theme.created_at(),
            updated_at: theme.updated_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TaskBody {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<i64>,
    pub theme_id: Option<ThemeId>,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<NaiveDate>,
}

impl From<TaskBody> for TaskDraft {
    fn from(body: TaskBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            priority: body.priority,
            theme_id: body.theme_id,
            assignee_id: body.assignee_id,
            due_date: body.due_date,
        }
    }
}

/// Partial task update. `null` clears the clearable fields and is ignored
/// for `title` and `priority`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPatchBody {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub priority: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub theme_id: Option<Option<ThemeId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<UserId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl From<TaskPatchBody> for TaskUpdate {
    fn from(body: TaskPatchBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            priority: body.priority,
            theme_id: body.theme_id,
            assignee_id: body.assignee_id,
            due_date: body.due_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeBody {
    pub to_status: String,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: u8,
    pub theme_id: Option<ThemeId>,
    pub assignee_id: Option<UserId>,
    pub created_by: UserId,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status(),
            priority: task.priority().value(),
            theme_id: task.theme_id(),
            assignee_id: task.assignee_id(),
            created_by: task.created_by(),
            due_date: task.due_date(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Raw listing parameters; see [`TaskListParams::into_query`].
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub theme_id: Option<ThemeId>,
    pub assignee_id: Option<UserId>,
    pub created_by: Option<UserId>,
    pub priority: Option<i64>,
    pub due_date_from: Option<NaiveDate>,
    pub due_date_to: Option<NaiveDate>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl TaskListParams {
    /// Validates filter values. Unknown sort keys fall back to the defaults;
    /// a malformed status or priority is rejected.
    pub fn into_query(self) -> Result<TaskQuery, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()
            .map_err(|err| ApiError::bad_request(err.to_string()))?;
        let priority = self
            .priority
            .map(Priority::new)
            .transpose()
            .map_err(|err| ApiError::bad_request(err.to_string()))?;
        Ok(TaskQuery {
            filter: TaskFilter {
                status,
                theme_id: self.theme_id,
                assignee_id: self.assignee_id,
                created_by: self.created_by,
                priority,
                due_date_from: self.due_date_from,
                due_date_to: self.due_date_to,
                text: self.q,
            },
            sort: self
                .sort
                .as_deref()
                .map(SortField::parse_or_default)
                .unwrap_or_default(),
            order: self
                .order
                .as_deref()
                .map(SortOrder::parse_or_default)
                .unwrap_or_default(),
            limit: self.limit.unwrap_or(TaskQuery::DEFAULT_LIMIT),
            offset: self.offset.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub items: Vec<TaskResponse>,
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: HistoryEntryId,
    pub task_id: TaskId,
    pub from_status: TaskStatus,
    pub to_status: TaskStatus,
    pub changed_by: UserId,
    pub changed_at: DateTime<Utc>,
}

impl From<&StatusHistoryEntry> for HistoryEntryResponse {
    fn from(entry: &StatusHistoryEntry) -> Self {
        Self {
            id: entry.id(),
            task_id: entry.task_id(),
            from_status: entry.from_status(),
            to_status: entry.to_status(),
            changed_by: entry.changed_by(),
            changed_at: entry.changed_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub counts_by_status: BTreeMap<String, u64>,
    pub counts_by_theme: BTreeMap<String, u64>,
    pub counts_by_assignee: BTreeMap<String, u64>,
    pub overdue_count: u64,
}

impl From<AnalyticsSummary> for SummaryResponse {
    fn from(summary: AnalyticsSummary) -> Self {
        Self {
            counts_by_status: keyed_by_string(summary.counts_by_status),
            counts_by_theme: keyed_by_string(summary.counts_by_theme),
            counts_by_assignee: keyed_by_string(summary.counts_by_assignee),
            overdue_count: summary.overdue_count,
        }
    }
}

fn keyed_by_string<K: ToString>(counts: BTreeMap<K, u64>) -> BTreeMap<String, u64> {
    counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
