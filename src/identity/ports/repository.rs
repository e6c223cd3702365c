//! Repository port for user persistence and lookup.

use crate::identity::domain::{Email, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateEmail`] when another account
    /// already uses the email address.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Persists changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist
    /// or [`UserRepositoryError::DuplicateEmail`] when the new email collides.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by normalized email address.
    async fn find_by_email(&self, email: &Email) -> UserRepositoryResult<Option<User>>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// An account with the same email already exists.
    #[error("email already registered: {0}")]
    DuplicateEmail(Email),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
