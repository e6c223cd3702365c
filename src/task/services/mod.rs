//! Orchestration services for tasks.

mod tasks;

pub use tasks::{TaskDraft, TaskService, TaskServiceError, TaskServiceResult, TaskUpdate};
