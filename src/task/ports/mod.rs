//! Port contracts for task persistence and reference lookup.

pub mod references;
pub mod repository;

pub use references::TaskReferences;
pub use repository::{
    StatusTransition, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    TransitionOutcome,
};
