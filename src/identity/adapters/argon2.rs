//! Argon2id implementation of the [`PasswordHasher`] port.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::identity::{
    domain::{PasswordHash, PlainPassword},
    ports::{CredentialError, PasswordHasher},
};

/// Password hasher using Argon2id with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| PasswordHash::from_phc(hash.to_string()))
            .map_err(|err| CredentialError(format!("failed to hash password: {err}")))
    }

    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, CredentialError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|err| CredentialError(format!("invalid password hash format: {err}")))?;
        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }
}
