//! Summary computation over the task repository.

use crate::analytics::domain::AnalyticsSummary;
use crate::error::ErrorKind;
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Errors raised while computing analytics.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Reading the task store failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl AnalyticsError {
    /// Classifies the error for the service boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Computes [`AnalyticsSummary`] values from the current task set.
pub struct AnalyticsService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for AnalyticsService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> AnalyticsService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new analytics service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Summarizes every stored task, judging overdue against the clock's
    /// current UTC date.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Repository`] when the tasks cannot be read.
    pub async fn summary(&self) -> Result<AnalyticsSummary, AnalyticsError> {
        let tasks = self.repository.all().await.inspect_err(|err| {
            error!(error = %err, "failed to load tasks for analytics");
        })?;
        let today = self.clock.utc().date_naive();
        Ok(AnalyticsSummary::summarize(&tasks, today))
    }
}
