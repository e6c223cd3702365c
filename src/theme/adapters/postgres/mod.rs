//! `PostgreSQL` adapters for theme persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresThemeRepository;
