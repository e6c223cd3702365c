//! Port contracts for identity management.
//!
//! Ports define infrastructure-agnostic interfaces used by the account
//! service.

pub mod credentials;
pub mod repository;

pub use credentials::{
    AccessToken, CredentialError, PasswordHasher, TokenError, TokenIssuer,
};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
