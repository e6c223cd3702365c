//! Tasktrack: task tracking with an audited status transition engine.
//!
//! Users register, log in with a bearer token and create tasks that move
//! through a flat five-state status alphabet. Every status change is
//! committed together with an append-only history entry, and every
//! mutation passes one authorization gate.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal principles:
//!
//! - **Domain**: validated value types and aggregates with no
//!   infrastructure dependencies
//! - **Ports**: async repository traits
//! - **Adapters**: in-memory and Diesel/`PostgreSQL` implementations
//! - **Services**: orchestration, gating and logging
//!
//! # Modules
//!
//! - [`access`]: the authorization gate
//! - [`identity`]: accounts, password hashing and bearer tokens
//! - [`theme`]: the admin-managed theme catalogue
//! - [`task`]: tasks, the status alphabet, history and queries
//! - [`analytics`]: read-only aggregation
//! - [`http`]: the axum router
//! - [`config`], [`telemetry`], [`app`]: process wiring

pub mod access;
pub mod analytics;
pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod persistence;
pub mod task;
pub mod telemetry;
pub mod theme;
