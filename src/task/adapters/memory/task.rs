//! In-memory task repository used by tests and the `memory` storage mode.

use async_trait::async_trait;
use std::collections::HashMap;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{PersistedTaskData, StatusHistoryEntry, Task, TaskId, TaskPage, TaskQuery},
    ports::{
        StatusTransition, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TransitionOutcome,
    },
};
use crate::theme::{
    domain::ThemeId,
    ports::{ThemeReferences, ThemeRepositoryError, ThemeRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// A single lock guards both tasks and history, so a transition reads the
/// current status and writes both records without interleaving.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
    #[cfg(test)]
    fail_history_appends: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    /// Entries in insertion order.
    history: Vec<StatusHistoryEntry>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent history append fail after the task row has
    /// been written, forcing the transition to roll back.
    #[cfg(test)]
    pub(crate) fn fail_history_appends(&self, enabled: bool) {
        self.fail_history_appends.store(enabled, Ordering::SeqCst);
    }

    #[cfg(test)]
    fn history_appends_fail(&self) -> bool {
        self.fail_history_appends.load(Ordering::SeqCst)
    }

    #[cfg(not(test))]
    #[expect(clippy::unused_self, reason = "mirrors the test-only switch")]
    const fn history_appends_fail(&self) -> bool {
        false
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryTaskState {
    fn append_history(
        &mut self,
        entry: StatusHistoryEntry,
        fail: bool,
    ) -> TaskRepositoryResult<()> {
        if fail {
            return Err(TaskRepositoryError::persistence(std::io::Error::other(
                "history append rejected",
            )));
        }
        self.history.push(entry);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        // Status is owned by the transition path; keep the stored value.
        let mut data = PersistedTaskData::from(task.clone());
        data.status = stored.status();
        *stored = Task::from_persisted(data);
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        state.history.retain(|entry| entry.task_id() != id);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let state = self.state.read().map_err(lock_error)?;
        let mut matching: Vec<&Task> = state
            .tasks
            .values()
            .filter(|task| query.filter.matches(task))
            .collect();
        matching.sort_by(|left, right| query.compare(left, right));

        let total = u64::try_from(matching.len()).map_err(TaskRepositoryError::persistence)?;
        let items = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();
        Ok(TaskPage { items, total })
    }

    async fn all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.values().cloned().collect())
    }

    async fn apply_transition(
        &self,
        transition: StatusTransition,
    ) -> TaskRepositoryResult<TransitionOutcome> {
        let fail = self.history_appends_fail();
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(&transition.task_id)
            .ok_or(TaskRepositoryError::NotFound(transition.task_id))?;

        let snapshot = stored.clone();
        let Some(entry) = stored.transition(transition.to_status, transition.actor, transition.at)
        else {
            return Ok(TransitionOutcome {
                task: snapshot,
                entry: None,
            });
        };
        let task = stored.clone();

        if let Err(err) = state.append_history(entry.clone(), fail) {
            state.tasks.insert(snapshot.id(), snapshot);
            return Err(err);
        }
        Ok(TransitionOutcome {
            task,
            entry: Some(entry),
        })
    }

    async fn history(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<StatusHistoryEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut entries: Vec<StatusHistoryEntry> = state
            .history
            .iter()
            .rev()
            .filter(|entry| entry.task_id() == task_id)
            .cloned()
            .collect();
        // Stable sort keeps newest-insertion-first among equal timestamps.
        entries.sort_by(|left, right| right.changed_at().cmp(&left.changed_at()));
        Ok(entries)
    }
}

#[async_trait]
impl ThemeReferences for InMemoryTaskRepository {
    async fn detach_theme(&self, id: ThemeId) -> ThemeRepositoryResult<usize> {
        let mut state = self.state.write().map_err(|err| {
            ThemeRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .tasks
            .values_mut()
            .map(|task| task.detach_theme(id))
            .filter(|changed| *changed)
            .count())
    }
}
