//! Task CRUD, listing and the status transition engine.

use crate::access::{Access, AccessDenied, AccessGate, Actor, Protected};
use crate::error::ErrorKind;
use crate::identity::domain::UserId;
use crate::task::{
    domain::{
        ParseTaskStatusError, Priority, StatusHistoryEntry, Task, TaskChanges, TaskDomainError,
        TaskFields, TaskId, TaskPage, TaskQuery, TaskStatus, TaskTitle,
    },
    ports::{StatusTransition, TaskReferences, TaskRepository, TaskRepositoryError},
};
use crate::theme::domain::ThemeId;
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Unvalidated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional priority; defaults to 3.
    pub priority: Option<i64>,
    /// Optional theme reference.
    pub theme_id: Option<ThemeId>,
    /// Optional assignee reference.
    pub assignee_id: Option<UserId>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Creates a draft with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            theme_id: None,
            assignee_id: None,
            due_date: None,
        }
    }
}

/// Unvalidated partial update.
///
/// For the clearable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement or cleared description.
    pub description: Option<Option<String>>,
    /// Replacement priority.
    pub priority: Option<i64>,
    /// Replacement or cleared theme.
    pub theme_id: Option<Option<ThemeId>>,
    /// Replacement or cleared assignee.
    pub assignee_id: Option<Option<UserId>>,
    /// Replacement or cleared due date.
    pub due_date: Option<Option<NaiveDate>>,
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The requested status is outside the alphabet.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A referenced theme does not exist.
    #[error("theme not found: {0}")]
    ThemeNotFound(ThemeId),

    /// A referenced assignee does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The authorization gate denied the operation.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl TaskServiceError {
    /// Classifies the error for the service boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::InvalidStatus(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) | Self::ThemeNotFound(_) | Self::UserNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
pub struct TaskService<R, F, C>
where
    R: TaskRepository + ?Sized,
    F: TaskReferences + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    references: Arc<F>,
    clock: Arc<C>,
}

impl<R, F, C> Clone for TaskService<R, F, C>
where
    R: TaskRepository + ?Sized,
    F: TaskReferences + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            references: Arc::clone(&self.references),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, F, C> TaskService<R, F, C>
where
    R: TaskRepository + ?Sized,
    F: TaskReferences + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, references: Arc<F>, clock: Arc<C>) -> Self {
        Self {
            repository,
            references,
            clock,
        }
    }

    /// Creates a task owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for invalid fields and
    /// [`TaskServiceError::ThemeNotFound`] or
    /// [`TaskServiceError::UserNotFound`] for dangling references.
    pub async fn create(&self, actor: Actor, draft: TaskDraft) -> TaskServiceResult<Task> {
        let fields = TaskFields {
            title: TaskTitle::new(draft.title)?,
            description: draft.description,
            priority: draft
                .priority
                .map(Priority::new)
                .transpose()?
                .unwrap_or_default(),
            theme_id: draft.theme_id,
            assignee_id: draft.assignee_id,
            due_date: draft.due_date,
        };
        self.check_references(fields.theme_id, fields.assignee_id).await?;

        let task = Task::create(fields, actor.id(), &*self.clock)?;
        self.repository
            .store(&task)
            .await
            .map_err(repository_failure)?;
        info!(task_id = %task.id(), actor = %actor.id(), "created task");
        Ok(task)
    }

    /// Fetches a task. Reads are not gated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown tasks.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(repository_failure)?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Lists tasks matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] on persistence failure.
    pub async fn list(&self, query: &TaskQuery) -> TaskServiceResult<TaskPage> {
        self.repository
            .list(query)
            .await
            .map_err(repository_failure)
    }

    /// Applies a partial update. Status cannot be changed here.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`], then
    /// [`TaskServiceError::Forbidden`] unless `actor` is the creator or an
    /// admin, then validation and reference errors.
    pub async fn update(
        &self,
        actor: Actor,
        id: TaskId,
        update: TaskUpdate,
    ) -> TaskServiceResult<Task> {
        let mut task = self.get(id).await?;
        Self::authorize(actor, &task, Access::Mutate)?;

        let changes = TaskChanges {
            title: update.title.map(TaskTitle::new).transpose()?,
            description: update.description,
            priority: update.priority.map(Priority::new).transpose()?,
            theme_id: update.theme_id,
            assignee_id: update.assignee_id,
            due_date: update.due_date,
        };
        self.check_references(changes.theme_id.flatten(), changes.assignee_id.flatten())
            .await?;

        task.apply_changes(changes, &*self.clock)?;
        self.repository
            .update(&task)
            .await
            .map_err(repository_failure)?;
        info!(task_id = %id, actor = %actor.id(), "updated task");
        self.get(id).await
    }

    /// Deletes a task and its history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] or
    /// [`TaskServiceError::Forbidden`].
    pub async fn delete(&self, actor: Actor, id: TaskId) -> TaskServiceResult<()> {
        let task = self.get(id).await?;
        Self::authorize(actor, &task, Access::Mutate)?;
        self.repository
            .delete(id)
            .await
            .map_err(repository_failure)?;
        info!(task_id = %id, actor = %actor.id(), "deleted task");
        Ok(())
    }

    /// Moves a task to `to_status`.
    ///
    /// Requesting the current status returns the task unchanged without a
    /// history entry. Otherwise the status, `updated_at` and a new history
    /// entry are committed together.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::InvalidStatus`] for values outside the
    /// alphabet, [`TaskServiceError::NotFound`] for unknown tasks and
    /// [`TaskServiceError::Forbidden`] unless `actor` may mutate the task,
    /// checked in that order. Nothing is written on any of them.
    pub async fn change_status(
        &self,
        actor: Actor,
        id: TaskId,
        to_status: &str,
    ) -> TaskServiceResult<Task> {
        let requested = TaskStatus::try_from(to_status)?;
        let task = self.get(id).await?;
        Self::authorize(actor, &task, Access::Mutate)?;

        let transition = StatusTransition {
            task_id: id,
            to_status: requested,
            actor: actor.id(),
            at: self.clock.utc(),
        };
        let outcome = self
            .repository
            .apply_transition(transition)
            .await
            .map_err(repository_failure)?;

        match &outcome.entry {
            Some(entry) => info!(
                task_id = %id,
                actor = %actor.id(),
                from = %entry.from_status(),
                to = %entry.to_status(),
                "changed task status"
            ),
            None => debug!(task_id = %id, status = %requested, "status unchanged"),
        }
        Ok(outcome.task)
    }

    /// Returns the task's status history, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`], then
    /// [`TaskServiceError::Forbidden`] unless `actor` is the creator, the
    /// assignee or an admin.
    pub async fn history(
        &self,
        actor: Actor,
        id: TaskId,
    ) -> TaskServiceResult<Vec<StatusHistoryEntry>> {
        let task = self.get(id).await?;
        Self::authorize(actor, &task, Access::ViewHistory)?;
        self.repository
            .history(id)
            .await
            .map_err(repository_failure)
    }

    async fn check_references(
        &self,
        theme_id: Option<ThemeId>,
        assignee_id: Option<UserId>,
    ) -> TaskServiceResult<()> {
        if let Some(theme) = theme_id {
            let exists = self
                .references
                .theme_exists(theme)
                .await
                .map_err(repository_failure)?;
            if !exists {
                return Err(TaskServiceError::ThemeNotFound(theme));
            }
        }
        if let Some(user) = assignee_id {
            let exists = self
                .references
                .user_exists(user)
                .await
                .map_err(repository_failure)?;
            if !exists {
                return Err(TaskServiceError::UserNotFound(user));
            }
        }
        Ok(())
    }

    fn authorize(actor: Actor, task: &Task, access: Access) -> TaskServiceResult<()> {
        AccessGate::check(Some(actor), task, access).map_err(|denied| {
            warn!(
                task_id = %task.id(),
                actor = %actor.id(),
                creator = ?task.creator(),
                %access,
                "task access denied"
            );
            TaskServiceError::from(denied)
        })
    }
}

fn repository_failure(err: TaskRepositoryError) -> TaskServiceError {
    let mapped = TaskServiceError::from(err);
    if let TaskServiceError::Repository(ref cause) = mapped {
        error!(error = %cause, "task repository failure");
    }
    mapped
}
