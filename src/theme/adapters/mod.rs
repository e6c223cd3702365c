//! Adapter implementations for theme ports.

pub mod memory;
pub mod postgres;
