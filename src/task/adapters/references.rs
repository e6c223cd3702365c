//! [`TaskReferences`] backed by the identity and theme repositories.

use crate::identity::{domain::UserId, ports::UserRepository};
use crate::task::ports::{TaskReferences, TaskRepositoryError, TaskRepositoryResult};
use crate::theme::{domain::ThemeId, ports::ThemeRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves task references against the owning repositories.
pub struct RepositoryReferences<U, T>
where
    U: UserRepository + ?Sized,
    T: ThemeRepository + ?Sized,
{
    users: Arc<U>,
    themes: Arc<T>,
}

impl<U, T> RepositoryReferences<U, T>
where
    U: UserRepository + ?Sized,
    T: ThemeRepository + ?Sized,
{
    /// Creates a lookup over the given repositories.
    #[must_use]
    pub const fn new(users: Arc<U>, themes: Arc<T>) -> Self {
        Self { users, themes }
    }
}

#[async_trait]
impl<U, T> TaskReferences for RepositoryReferences<U, T>
where
    U: UserRepository + ?Sized,
    T: ThemeRepository + ?Sized,
{
    async fn theme_exists(&self, id: ThemeId) -> TaskRepositoryResult<bool> {
        let theme = self
            .themes
            .find_by_id(id)
            .await
            .map_err(TaskRepositoryError::persistence)?;
        Ok(theme.is_some())
    }

    async fn user_exists(&self, id: UserId) -> TaskRepositoryResult<bool> {
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(TaskRepositoryError::persistence)?;
        Ok(user.is_some())
    }
}
