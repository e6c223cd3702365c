//! Admin-managed theme catalogue that tasks may reference.
//!
//! Reads are open to everyone; creating, renaming and deleting themes passes
//! the [`Access::Administer`](crate::access::Access::Administer) gate.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
