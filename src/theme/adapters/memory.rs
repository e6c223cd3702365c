//! In-memory theme repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::theme::{
    domain::{Theme, ThemeId},
    ports::{ThemeRepository, ThemeRepositoryError, ThemeRepositoryResult},
};

/// Thread-safe in-memory theme repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryThemeRepository {
    themes: Arc<RwLock<HashMap<ThemeId, Theme>>>,
}

impl InMemoryThemeRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ThemeRepositoryError {
    ThemeRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn name_taken(themes: &HashMap<ThemeId, Theme>, theme: &Theme) -> bool {
    themes
        .values()
        .any(|existing| existing.id() != theme.id() && existing.name() == theme.name())
}

#[async_trait]
impl ThemeRepository for InMemoryThemeRepository {
    async fn store(&self, theme: &Theme) -> ThemeRepositoryResult<()> {
        let mut themes = self.themes.write().map_err(lock_error)?;
        if name_taken(&themes, theme) {
            return Err(ThemeRepositoryError::DuplicateName(theme.name().clone()));
        }
        themes.insert(theme.id(), theme.clone());
        Ok(())
    }

    async fn update(&self, theme: &Theme) -> ThemeRepositoryResult<()> {
        let mut themes = self.themes.write().map_err(lock_error)?;
        if !themes.contains_key(&theme.id()) {
            return Err(ThemeRepositoryError::NotFound(theme.id()));
        }
        if name_taken(&themes, theme) {
            return Err(ThemeRepositoryError::DuplicateName(theme.name().clone()));
        }
        themes.insert(theme.id(), theme.clone());
        Ok(())
    }

    async fn delete(&self, id: ThemeId) -> ThemeRepositoryResult<()> {
        let mut themes = self.themes.write().map_err(lock_error)?;
        themes
            .remove(&id)
            .map(|_| ())
            .ok_or(ThemeRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: ThemeId) -> ThemeRepositoryResult<Option<Theme>> {
        let themes = self.themes.read().map_err(lock_error)?;
        Ok(themes.get(&id).cloned())
    }

    async fn list(&self, limit: usize, offset: usize) -> ThemeRepositoryResult<Vec<Theme>> {
        let themes = self.themes.read().map_err(lock_error)?;
        let mut ordered: Vec<Theme> = themes.values().cloned().collect();
        ordered.sort_by(|left, right| {
            left.name()
                .cmp(right.name())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(ordered.into_iter().skip(offset).take(limit).collect())
    }
}
