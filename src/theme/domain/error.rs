//! Validation errors for theme values.

use thiserror::Error;

/// Errors raised while validating theme fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThemeDomainError {
    /// The name is blank or too long.
    #[error("theme name must be between 1 and {max} characters")]
    InvalidName {
        /// Maximum accepted length.
        max: usize,
    },

    /// The description exceeds the storage limit.
    #[error("theme description must be at most {max} characters")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}
