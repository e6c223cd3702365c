//! Domain model for tasks and their status history.
//!
//! A task moves through a flat five-state alphabet: any status may change to
//! any other. Each real change produces exactly one [`StatusHistoryEntry`];
//! a request for the current status produces none.

mod error;
mod history;
mod ids;
mod query;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use history::{PersistedHistoryData, StatusHistoryEntry};
pub use ids::{HistoryEntryId, TaskId};
pub use query::{SortField, SortOrder, TaskFilter, TaskPage, TaskQuery};
pub use task::{
    PersistedTaskData, Priority, Task, TaskChanges, TaskFields, TaskStatus, TaskTitle,
};
