//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is blank or too long after trimming.
    #[error("task title must be between 1 and {max} characters")]
    InvalidTitle {
        /// Maximum accepted length.
        max: usize,
    },

    /// The description exceeds the storage limit.
    #[error("task description must be at most {max} characters")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
    },

    /// The priority is outside `1..=5`.
    #[error("priority must be between 1 and 5, got {0}")]
    InvalidPriority(i64),
}

/// Error returned while parsing a status outside the alphabet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
