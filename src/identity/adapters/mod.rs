//! Adapter implementations for identity ports.

pub mod argon2;
pub mod jwt;
pub mod memory;
pub mod postgres;
