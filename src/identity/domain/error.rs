//! Error types for identity validation.

use thiserror::Error;

/// Errors returned while constructing identity values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The username is empty or too long.
    #[error("username must be between 1 and {max} characters")]
    InvalidUsername {
        /// Maximum accepted length.
        max: usize,
    },

    /// The password is shorter than the accepted minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}
