//! Shared world state for task status transition BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use tasktrack::access::Actor;
use tasktrack::identity::domain::UserId;
use tasktrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    ports::{TaskReferences, TaskRepositoryResult},
    services::{TaskService, TaskServiceError},
};
use tasktrack::theme::domain::ThemeId;

/// Reference checker that accepts every theme and user.
#[derive(Debug, Default)]
pub struct OpenReferences;

#[async_trait]
impl TaskReferences for OpenReferences {
    async fn theme_exists(&self, _id: ThemeId) -> TaskRepositoryResult<bool> {
        Ok(true)
    }

    async fn user_exists(&self, _id: UserId) -> TaskRepositoryResult<bool> {
        Ok(true)
    }
}

/// Service type used by the BDD world.
pub type TestTaskService = TaskService<InMemoryTaskRepository, OpenReferences, DefaultClock>;

/// Scenario world for task transition behaviour tests.
pub struct TaskTransitionWorld {
    pub service: TestTaskService,
    pub repository: Arc<InMemoryTaskRepository>,
    pub actors: HashMap<String, Actor>,
    pub task: Option<Task>,
    pub last_result: Option<Result<Task, TaskServiceError>>,
}

impl TaskTransitionWorld {
    /// Creates a world with an empty repository and no actors.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let service = TaskService::new(
            Arc::clone(&repository),
            Arc::new(OpenReferences),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            repository,
            actors: HashMap::new(),
            task: None,
            last_result: None,
        }
    }

    /// Returns the named actor, creating a regular user on first use.
    pub fn actor(&mut self, name: &str) -> Actor {
        *self
            .actors
            .entry(name.to_owned())
            .or_insert_with(|| Actor::new(UserId::new(), false))
    }

    /// Returns the scenario's task.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TaskTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskTransitionWorld {
    TaskTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
