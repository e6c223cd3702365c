//! Existence checks for the theme and user a task refers to.

use super::TaskRepositoryResult;
use crate::identity::domain::UserId;
use crate::theme::domain::ThemeId;
use async_trait::async_trait;

/// Lookup of records owned by other contexts.
#[async_trait]
pub trait TaskReferences: Send + Sync {
    /// Returns whether the theme exists.
    async fn theme_exists(&self, id: ThemeId) -> TaskRepositoryResult<bool>;

    /// Returns whether the user exists.
    async fn user_exists(&self, id: UserId) -> TaskRepositoryResult<bool>;
}
