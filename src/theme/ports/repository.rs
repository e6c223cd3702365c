//! Repository port for theme persistence.

use crate::theme::domain::{Theme, ThemeId, ThemeName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for theme repository operations.
pub type ThemeRepositoryResult<T> = Result<T, ThemeRepositoryError>;

/// Theme persistence contract.
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// Stores a new theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeRepositoryError::DuplicateName`] when the name is taken.
    async fn store(&self, theme: &Theme) -> ThemeRepositoryResult<()>;

    /// Persists changes to an existing theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeRepositoryError::NotFound`] for unknown themes and
    /// [`ThemeRepositoryError::DuplicateName`] when the new name is taken.
    async fn update(&self, theme: &Theme) -> ThemeRepositoryResult<()>;

    /// Deletes a theme; tasks referencing it lose the reference.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeRepositoryError::NotFound`] for unknown themes.
    async fn delete(&self, id: ThemeId) -> ThemeRepositoryResult<()>;

    /// Finds a theme by identifier.
    async fn find_by_id(&self, id: ThemeId) -> ThemeRepositoryResult<Option<Theme>>;

    /// Lists themes ordered by name.
    async fn list(&self, limit: usize, offset: usize) -> ThemeRepositoryResult<Vec<Theme>>;
}

/// Clears theme references held by other aggregates when a theme is removed.
#[async_trait]
pub trait ThemeReferences: Send + Sync {
    /// Detaches `id` from every record that references it and returns how
    /// many records changed.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeRepositoryError::Persistence`] when the update fails.
    async fn detach_theme(&self, id: ThemeId) -> ThemeRepositoryResult<usize>;
}

/// Errors returned by theme repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ThemeRepositoryError {
    /// Another theme already uses the name.
    #[error("theme name already exists: {0}")]
    DuplicateName(ThemeName),

    /// The theme was not found.
    #[error("theme not found: {0}")]
    NotFound(ThemeId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ThemeRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
