//! Theme aggregate and its validated fields.

use super::ThemeDomainError;
use crate::access::Protected;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const MAX_DESCRIPTION_LEN: usize = 1024;

/// Unique identifier for a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(Uuid);

impl ThemeId {
    /// Creates a new random theme identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a theme identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique, trimmed theme name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeName(String);

impl ThemeName {
    const MAX_LEN: usize = 255;

    /// Creates a validated theme name.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeDomainError::InvalidName`] when the trimmed value is
    /// empty or longer than 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ThemeDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if length == 0 || length > Self::MAX_LEN {
            return Err(ThemeDomainError::InvalidName { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_description(
    description: Option<String>,
) -> Result<Option<String>, ThemeDomainError> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => {
            Err(ThemeDomainError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LEN,
            })
        }
        other => Ok(other),
    }
}

/// A named grouping that tasks may reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    id: ThemeId,
    name: ThemeName,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedThemeData {
    /// Persisted identifier.
    pub id: ThemeId,
    /// Persisted name.
    pub name: ThemeName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Theme {
    /// Creates a new theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeDomainError::DescriptionTooLong`] for oversize
    /// descriptions.
    pub fn new(
        name: ThemeName,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, ThemeDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: ThemeId::new(),
            name,
            description: validate_description(description)?,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a theme from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedThemeData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the theme identifier.
    #[must_use]
    pub const fn id(&self) -> ThemeId {
        self.id
    }

    /// Returns the theme name.
    #[must_use]
    pub const fn name(&self) -> &ThemeName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the name.
    pub fn rename(&mut self, name: ThemeName, clock: &impl Clock) {
        self.name = name;
        self.updated_at = clock.utc();
    }

    /// Replaces or clears the description.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeDomainError::DescriptionTooLong`] for oversize
    /// descriptions; the theme is left unchanged.
    pub fn describe(
        &mut self,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), ThemeDomainError> {
        self.description = validate_description(description)?;
        self.updated_at = clock.utc();
        Ok(())
    }
}

impl Protected for Theme {
    fn creator(&self) -> Option<UserId> {
        None
    }
}
