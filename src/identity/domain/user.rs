//! User aggregate and credential value types.

use super::{Email, IdentityDomainError, UserId, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::fmt;

/// A password as typed by the user, validated but not yet hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(String);

impl PlainPassword {
    const MIN_LEN: usize = 8;

    /// Creates a validated plain-text password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::PasswordTooShort`] for passwords under
    /// eight characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        if raw.chars().count() < Self::MIN_LEN {
            return Err(IdentityDomainError::PasswordTooShort { min: Self::MIN_LEN });
        }
        Ok(Self(raw))
    }

    /// Returns the raw password for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(**redacted**)")
    }
}

/// PHC-formatted password hash as stored in the identity store.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an already computed hash string.
    #[must_use]
    pub const fn from_phc(value: String) -> Self {
        Self(value)
    }

    /// Returns the PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    username: Username,
    password_hash: PasswordHash,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted login email.
    pub email: Email,
    /// Persisted display name.
    pub username: Username,
    /// Persisted password hash.
    pub password_hash: PasswordHash,
    /// Persisted admin flag.
    pub is_admin: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a regular (non-admin) user.
    #[must_use]
    pub fn register(
        email: Email,
        username: Username,
        password_hash: PasswordHash,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            email,
            username,
            password_hash,
            is_admin: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates a user holding the admin flag.
    #[must_use]
    pub fn register_admin(
        email: Email,
        username: Username,
        password_hash: PasswordHash,
        clock: &impl Clock,
    ) -> Self {
        Self {
            is_admin: true,
            ..Self::register(email, username, password_hash, clock)
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            username: data.username,
            password_hash: data.password_hash,
            is_admin: data.is_admin,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns whether the user holds the admin flag.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
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

    /// Replaces the login email.
    pub fn change_email(&mut self, email: Email, clock: &impl Clock) {
        self.email = email;
        self.touch(clock);
    }

    /// Replaces the display name.
    pub fn rename(&mut self, username: Username, clock: &impl Clock) {
        self.username = username;
        self.touch(clock);
    }

    /// Replaces the stored password hash.
    pub fn change_password(&mut self, password_hash: PasswordHash, clock: &impl Clock) {
        self.password_hash = password_hash;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
