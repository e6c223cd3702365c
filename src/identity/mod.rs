//! Identity management: user accounts, credentials and bearer tokens.
//!
//! Users register with an email address and password, log in to obtain a
//! signed access token, and present that token on every mutating request.
//! The module follows the same hexagonal split as the other contexts:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
