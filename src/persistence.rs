//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Diesel connections are synchronous, so every adapter offloads its work to
//! the blocking thread pool through [`run_blocking_with`].

use diesel::connection::SimpleConnection;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use thiserror::Error;
use tracing::info;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type.
pub type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot establish its initial
/// connections.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Runs a blocking task and maps join errors into the caller's error type.
///
/// # Errors
///
/// Returns the closure's error, or `map_err` applied to the join error when
/// the blocking task panicked or was cancelled.
pub async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
///
/// # Errors
///
/// Returns `map_err` applied to the pool error when no connection is
/// available.
pub fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}

/// Converts a page bound to a SQL `BIGINT`, saturating at `i64::MAX`.
#[must_use]
pub fn sql_bound(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Idempotent DDL creating every table the adapters use.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-01-20-000000_create_task_tracker/up.sql");

/// Errors raised while applying [`SCHEMA_SQL`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No connection could be checked out.
    #[error("failed to obtain connection: {0}")]
    Pool(#[from] PoolError),
    /// A DDL statement failed.
    #[error("failed to apply schema: {0}")]
    Query(#[from] diesel::result::Error),
    /// The blocking task did not complete.
    #[error("schema task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Creates the tables, indexes and constraints when they are missing.
///
/// # Errors
///
/// Returns [`SchemaError`] when a connection cannot be obtained or a
/// statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), SchemaError> {
    let pool = pool.clone();
    run_blocking_with(
        move || {
            let mut conn = get_conn_with(&pool, SchemaError::Pool)?;
            conn.batch_execute(SCHEMA_SQL)?;
            Ok(())
        },
        SchemaError::Join,
    )
    .await?;
    info!("database schema is up to date");
    Ok(())
}
