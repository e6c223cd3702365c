//! Theme catalogue service: public reads, admin-gated writes.

use crate::access::{Access, AccessDenied, AccessGate, Actor, Protected};
use crate::error::ErrorKind;
use crate::identity::domain::UserId;
use crate::theme::{
    domain::{Theme, ThemeDomainError, ThemeId, ThemeName},
    ports::{ThemeReferences, ThemeRepository, ThemeRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Input for creating a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDraft {
    /// Requested name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial theme update.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeChanges {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement or cleared description.
    pub description: Option<Option<String>>,
}

/// Service-level errors for theme operations.
#[derive(Debug, Error)]
pub enum ThemeServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ThemeDomainError),

    /// The theme does not exist.
    #[error("theme not found: {0}")]
    NotFound(ThemeId),

    /// Another theme already uses the name.
    #[error("theme name already exists: {0}")]
    NameTaken(ThemeName),

    /// The caller is not an administrator.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(ThemeRepositoryError),
}

impl From<ThemeRepositoryError> for ThemeServiceError {
    fn from(err: ThemeRepositoryError) -> Self {
        match err {
            ThemeRepositoryError::DuplicateName(name) => Self::NameTaken(name),
            ThemeRepositoryError::NotFound(id) => Self::NotFound(id),
            other @ ThemeRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

impl ThemeServiceError {
    /// Classifies the error for the service boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::NameTaken(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for theme service operations.
pub type ThemeServiceResult<T> = Result<T, ThemeServiceError>;

/// The catalogue as a whole, used to gate creation.
struct Catalogue;

impl Protected for Catalogue {
    fn creator(&self) -> Option<UserId> {
        None
    }
}

/// Theme catalogue orchestration service.
pub struct ThemeCatalogService<T, L, C>
where
    T: ThemeRepository + ?Sized,
    L: ThemeReferences + ?Sized,
    C: Clock + Send + Sync,
{
    themes: Arc<T>,
    references: Arc<L>,
    clock: Arc<C>,
}

impl<T, L, C> Clone for ThemeCatalogService<T, L, C>
where
    T: ThemeRepository + ?Sized,
    L: ThemeReferences + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            themes: Arc::clone(&self.themes),
            references: Arc::clone(&self.references),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T, L, C> ThemeCatalogService<T, L, C>
where
    T: ThemeRepository + ?Sized,
    L: ThemeReferences + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new catalogue service.
    #[must_use]
    pub const fn new(themes: Arc<T>, references: Arc<L>, clock: Arc<C>) -> Self {
        Self {
            themes,
            references,
            clock,
        }
    }

    /// Lists themes ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeServiceError::Repository`] on persistence failure.
    pub async fn list(&self, limit: usize, offset: usize) -> ThemeServiceResult<Vec<Theme>> {
        Ok(self.themes.list(limit, offset).await?)
    }

    /// Fetches a theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeServiceError::NotFound`] for unknown themes.
    pub async fn get(&self, id: ThemeId) -> ThemeServiceResult<Theme> {
        self.themes
            .find_by_id(id)
            .await?
            .ok_or(ThemeServiceError::NotFound(id))
    }

    /// Creates a theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeServiceError::Forbidden`] for non-admins,
    /// [`ThemeServiceError::Domain`] for invalid fields and
    /// [`ThemeServiceError::NameTaken`] for duplicate names.
    pub async fn create(&self, actor: Actor, draft: ThemeDraft) -> ThemeServiceResult<Theme> {
        Self::administer(actor, &Catalogue)?;
        let name = ThemeName::new(draft.name)?;
        let theme = Theme::new(name, draft.description, &*self.clock)?;
        self.themes.store(&theme).await?;
        info!(theme_id = %theme.id(), actor = %actor.id(), "created theme");
        Ok(theme)
    }

    /// Applies a partial update to a theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeServiceError::NotFound`] before checking the admin
    /// flag, then [`ThemeServiceError::Forbidden`], then validation and
    /// uniqueness errors.
    pub async fn update(
        &self,
        actor: Actor,
        id: ThemeId,
        changes: ThemeChanges,
    ) -> ThemeServiceResult<Theme> {
        let mut theme = self.get(id).await?;
        Self::administer(actor, &theme)?;

        if let Some(name) = changes.name {
            theme.rename(ThemeName::new(name)?, &*self.clock);
        }
        if let Some(description) = changes.description {
            theme.describe(description, &*self.clock)?;
        }
        self.themes.update(&theme).await?;
        info!(theme_id = %id, actor = %actor.id(), "updated theme");
        Ok(theme)
    }

    /// Deletes a theme and detaches it from referencing tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeServiceError::NotFound`] or
    /// [`ThemeServiceError::Forbidden`].
    pub async fn delete(&self, actor: Actor, id: ThemeId) -> ThemeServiceResult<()> {
        let theme = self.get(id).await?;
        Self::administer(actor, &theme)?;
        self.themes.delete(id).await?;
        let detached = self.references.detach_theme(id).await?;
        info!(theme_id = %id, actor = %actor.id(), detached, "deleted theme");
        Ok(())
    }

    fn administer(actor: Actor, resource: &impl Protected) -> ThemeServiceResult<()> {
        AccessGate::check(Some(actor), resource, Access::Administer).map_err(|denied| {
            warn!(actor = %actor.id(), "theme administration denied");
            ThemeServiceError::from(denied)
        })
    }
}
