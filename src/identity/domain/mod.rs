//! Domain model for user identities.

mod error;
mod ids;
mod user;

pub use error::IdentityDomainError;
pub use ids::{Email, UserId, Username};
pub use user::{PasswordHash, PersistedUserData, PlainPassword, User};
