//! `PostgreSQL` adapters for task and status history persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTaskRepository;
