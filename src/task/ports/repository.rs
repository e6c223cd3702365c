//! Repository port for tasks and their status history.
//!
//! History entries are written only by [`TaskRepository::apply_transition`],
//! which reads the current status, updates the task and appends the entry as
//! one atomic unit. There is no standalone append operation.

use crate::identity::domain::UserId;
use crate::task::domain::{StatusHistoryEntry, Task, TaskId, TaskPage, TaskQuery, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// A requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    /// Task to change.
    pub task_id: TaskId,
    /// Requested status.
    pub to_status: TaskStatus,
    /// Acting user recorded in the history entry.
    pub actor: UserId,
    /// Timestamp applied to both the task and the entry.
    pub at: DateTime<Utc>,
}

/// Result of [`TaskRepository::apply_transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// The task after the transition.
    pub task: Task,
    /// The appended entry; `None` when the task already had the status.
    pub entry: Option<StatusHistoryEntry>,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier is
    /// already in use.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists the editable fields of an existing task.
    ///
    /// Status is not written; it changes only through
    /// [`TaskRepository::apply_transition`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task together with its history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns one page of matching tasks and the total match count, both
    /// computed from the same snapshot.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage>;

    /// Returns every task, for aggregation.
    async fn all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Applies a status change atomically.
    ///
    /// The current status is read under the same lock or transaction that
    /// writes. When it already equals the requested status nothing is
    /// written and [`TransitionOutcome::entry`] is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] for unknown tasks. Any
    /// failure leaves both the task and the history untouched.
    async fn apply_transition(
        &self,
        transition: StatusTransition,
    ) -> TaskRepositoryResult<TransitionOutcome>;

    /// Returns the task's history, most recent first; entries sharing a
    /// timestamp are returned newest insertion first.
    async fn history(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<StatusHistoryEntry>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
