//! Tasks, their status transition engine and the status history log.
//!
//! Status changes flow through [`services::TaskService::change_status`],
//! which validates the requested status, applies the authorization gate and
//! hands the change to [`ports::TaskRepository::apply_transition`]. That
//! call updates the task and appends the history entry as one atomic unit.
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
