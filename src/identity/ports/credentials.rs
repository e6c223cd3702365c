//! Ports for password hashing and bearer-token issuance.

use crate::identity::domain::{PasswordHash, PlainPassword, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plain password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the hashing backend fails.
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, CredentialError>;

    /// Checks a candidate password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the stored hash cannot be parsed.
    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, CredentialError>;
}

/// Error raised by password hashing backends.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("credential backend failure: {0}")]
pub struct CredentialError(pub String);

/// Signed bearer token handed to clients after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    /// Encoded token value.
    pub access_token: String,
    /// Token scheme, always `bearer`.
    pub token_type: &'static str,
}

impl AccessToken {
    /// Wraps an encoded bearer token.
    #[must_use]
    pub const fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Issues and verifies bearer tokens bound to a user identifier.
pub trait TokenIssuer: Send + Sync {
    /// Issues a token for `subject` valid from `issued_at` for the configured
    /// lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] when signing fails.
    fn issue(&self, subject: UserId, issued_at: DateTime<Utc>) -> Result<AccessToken, TokenError>;

    /// Verifies a token and returns its subject.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] or [`TokenError::Invalid`] for tokens
    /// that must not be honoured.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}

/// Errors raised while issuing or verifying tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token has expired.
    #[error("token expired")]
    Expired,

    /// The token is malformed, badly signed or names no valid subject.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// The token could not be signed.
    #[error("failed to sign token: {0}")]
    Encoding(String),
}
