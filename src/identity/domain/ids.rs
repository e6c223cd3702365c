//! Identifier and validated scalar types for the identity domain.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID.
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

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized email address used as the login identifier.
///
/// Addresses are trimmed and lower-cased so uniqueness checks are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    const MAX_LEN: usize = 255;

    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidEmail`] unless the value has a
    /// single `@` separating non-empty local and domain parts, contains no
    /// whitespace and fits the storage column.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_lowercase();
        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && parts.next().is_none()
            && !normalized.chars().any(char::is_whitespace)
            && normalized.chars().count() <= Self::MAX_LEN;

        if !is_valid {
            return Err(IdentityDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    const MAX_LEN: usize = 255;

    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidUsername`] when the trimmed value
    /// is empty or longer than 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() > Self::MAX_LEN {
            return Err(IdentityDomainError::InvalidUsername { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
