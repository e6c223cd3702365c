//! Adapter implementations for task ports.

pub mod memory;
pub mod postgres;
pub mod references;
