//! Task aggregate root, its status alphabet and validated fields.

use super::{ParseTaskStatusError, StatusHistoryEntry, TaskDomainError, TaskId};
use crate::access::Protected;
use crate::identity::domain::UserId;
use crate::theme::domain::ThemeId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_DESCRIPTION_LEN: usize = 2000;

/// Task status. The alphabet is flat: every pair of distinct statuses is a
/// legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    New,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed.
    Done,
    /// Task cannot progress until something else happens.
    Blocked,
    /// Task has been abandoned.
    Canceled,
}

impl TaskStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::InProgress,
        Self::Done,
        Self::Blocked,
        Self::Canceled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Blocked => "blocked",
            Self::Canceled => "canceled",
        }
    }

    /// Returns whether the status closes the task for overdue accounting.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Done | Self::Canceled)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trimmed, non-empty task title of at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LEN: usize = 255;

    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTitle`] for blank or overlong
    /// values.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if length == 0 || length > Self::MAX_LEN {
            return Err(TaskDomainError::InvalidTitle { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Task priority in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    /// Priority assigned when the caller does not choose one.
    pub const DEFAULT: Self = Self(3);

    /// Creates a validated priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPriority`] outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, TaskDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|candidate| (1..=5).contains(candidate))
            .map(Self)
            .ok_or(TaskDomainError::InvalidPriority(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn validate_description(description: Option<String>) -> Result<Option<String>, TaskDomainError> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => {
            Err(TaskDomainError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LEN,
            })
        }
        other => Ok(other),
    }
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    /// Task title.
    pub title: TaskTitle,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Priority, defaulting to [`Priority::DEFAULT`].
    pub priority: Priority,
    /// Optional theme reference.
    pub theme_id: Option<ThemeId>,
    /// Optional assignee reference.
    pub assignee_id: Option<UserId>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
}

impl TaskFields {
    /// Creates fields with only a title set.
    #[must_use]
    pub fn titled(title: TaskTitle) -> Self {
        Self {
            title,
            description: None,
            priority: Priority::DEFAULT,
            theme_id: None,
            assignee_id: None,
            due_date: None,
        }
    }
}

/// Partial update of a task's editable fields.
///
/// The outer `Option` means "leave unchanged"; for clearable fields the
/// inner `None` clears the value. Status is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement or cleared description.
    pub description: Option<Option<String>>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Replacement or cleared theme.
    pub theme_id: Option<Option<ThemeId>>,
    /// Replacement or cleared assignee.
    pub assignee_id: Option<Option<UserId>>,
    /// Replacement or cleared due date.
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskChanges {
    /// Returns whether the update touches no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.theme_id.is_none()
            && self.assignee_id.is_none()
            && self.due_date.is_none()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: Priority,
    theme_id: Option<ThemeId>,
    assignee_id: Option<UserId>,
    created_by: UserId,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted theme reference.
    pub theme_id: Option<ThemeId>,
    /// Persisted assignee reference.
    pub assignee_id: Option<UserId>,
    /// Persisted creator reference.
    pub created_by: UserId,
    /// Persisted due date.
    pub due_date: Option<NaiveDate>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in [`TaskStatus::New`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DescriptionTooLong`] for oversize
    /// descriptions.
    pub fn create(
        fields: TaskFields,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: fields.title,
            description: validate_description(fields.description)?,
            status: TaskStatus::New,
            priority: fields.priority,
            theme_id: fields.theme_id,
            assignee_id: fields.assignee_id,
            created_by,
            due_date: fields.due_date,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            theme_id: data.theme_id,
            assignee_id: data.assignee_id,
            created_by: data.created_by,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the theme reference, if any.
    #[must_use]
    pub const fn theme_id(&self) -> Option<ThemeId> {
        self.theme_id
    }

    /// Returns the assignee reference, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial field update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DescriptionTooLong`] before any field is
    /// changed.
    pub fn apply_changes(
        &mut self,
        changes: TaskChanges,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if changes.is_empty() {
            return Ok(());
        }
        let description = changes.description.map(validate_description).transpose()?;

        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(theme_id) = changes.theme_id {
            self.theme_id = theme_id;
        }
        if let Some(assignee_id) = changes.assignee_id {
            self.assignee_id = assignee_id;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Moves the task to `to_status` on behalf of `actor` at `at`.
    ///
    /// Returns the history entry describing the change, or `None` when the
    /// task already has `to_status`; in that case nothing is modified.
    pub fn transition(
        &mut self,
        to_status: TaskStatus,
        actor: UserId,
        at: DateTime<Utc>,
    ) -> Option<StatusHistoryEntry> {
        if self.status == to_status {
            return None;
        }
        let from_status = self.status;
        self.status = to_status;
        self.updated_at = at;
        Some(StatusHistoryEntry::record(
            self.id,
            from_status,
            to_status,
            actor,
            at,
        ))
    }

    /// Detaches the theme reference when it equals `theme_id`.
    ///
    /// Returns whether the task changed. `updated_at` is left alone, matching
    /// a database-level `ON DELETE SET NULL`.
    pub fn detach_theme(&mut self, theme_id: ThemeId) -> bool {
        if self.theme_id == Some(theme_id) {
            self.theme_id = None;
            true
        } else {
            false
        }
    }

    /// Returns whether the task is past due on `today` and still open.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_closed() && self.due_date.is_some_and(|due| due < today)
    }
}

impl From<Task> for PersistedTaskData {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            theme_id: task.theme_id,
            assignee_id: task.assignee_id,
            created_by: task.created_by,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl Protected for Task {
    fn creator(&self) -> Option<UserId> {
        Some(self.created_by)
    }

    fn assignee(&self) -> Option<UserId> {
        self.assignee_id
    }
}
