//! Shared fixtures for `PostgreSQL` integration tests.
//!
//! Every test gets its own database cloned from a pre-migrated template on
//! the shared embedded cluster.

use chrono::Duration;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use eyre::eyre;
use pg_embedded_setup_unpriv::TestCluster;
pub use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::fixture;
use std::future::Future;
use tasktrack::access::Actor;
use tasktrack::app::postgres_state;
use tasktrack::http::AppState;
use tasktrack::identity::{adapters::jwt::JwtTokenIssuer, services::RegisterRequest};
use tasktrack::persistence::{PgPool, SCHEMA_SQL, build_pool};
use tasktrack::task::domain::TaskId;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Template database holding the applied schema.
pub const TEMPLATE_DB: &str = "tasktrack_test_template";

const TEST_SECRET: &[u8] = b"postgres-suite-secret-with-32-plus-bytes";

/// Creates a single-threaded runtime for driving the async services.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> eyre::Result<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if the template cannot be created or migrated.
pub fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre!("{e}"))?;
            conn.batch_execute(SCHEMA_SQL).map_err(|e| eyre!("{e}"))?;
            Ok(())
        })
        .map_err(|err| eyre!("template setup failed: {err}"))
}

/// Database cloned from [`TEMPLATE_DB`] and dropped with the guard.
pub struct TemporaryDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl TemporaryDatabase {
    fn create(cluster: &'static TestCluster) -> eyre::Result<Self> {
        let name = format!("tasktrack_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|err| eyre!("failed to create {name}: {err}"))?;
        Ok(Self { cluster, name })
    }

    fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        self.cluster.drop_database(self.name.as_str()).ok();
    }
}

/// Application state wired to Diesel adapters on a temporary database.
///
/// Fields drop in order, so pooled connections close before the database
/// is dropped.
pub struct PgContext {
    /// Services backed by `PostgreSQL`.
    pub state: AppState,
    /// Pool bound to the temporary database.
    pub pool: PgPool,
    runtime: Runtime,
    _database: TemporaryDatabase,
}

impl PgContext {
    /// Drives a test body to completion on the context's runtime.
    ///
    /// # Errors
    ///
    /// Returns the body's error.
    pub fn block_on<F>(&self, body: F) -> eyre::Result<()>
    where
        F: Future<Output = eyre::Result<()>>,
    {
        self.runtime.block_on(body)
    }
}

/// Builds a [`PgContext`] on the shared embedded cluster.
///
/// # Errors
///
/// Returns an error if the template, database or pool cannot be set up.
#[fixture]
pub fn pg(shared_test_cluster: &'static TestCluster) -> eyre::Result<PgContext> {
    ensure_template(shared_test_cluster)?;
    let database = TemporaryDatabase::create(shared_test_cluster)?;
    let pool = build_pool(&database.url(), 2)?;
    let tokens = JwtTokenIssuer::new(TEST_SECRET, Duration::minutes(5));
    Ok(PgContext {
        state: postgres_state(pool.clone(), tokens),
        pool,
        runtime: test_runtime()?,
        _database: database,
    })
}

/// Registers a regular user named `name`.
///
/// # Errors
///
/// Returns an error if registration fails.
pub async fn register(state: &AppState, name: &str) -> eyre::Result<Actor> {
    let user = state
        .accounts
        .register(RegisterRequest::new(
            format!("{name}@example.com"),
            name,
            "password123",
        ))
        .await?;
    Ok(Actor::from(&user))
}

/// Creates an administrator named `name`.
///
/// # Errors
///
/// Returns an error if the account cannot be created.
pub async fn admin(state: &AppState, name: &str) -> eyre::Result<Actor> {
    let (user, _) = state
        .accounts
        .ensure_admin(RegisterRequest::new(
            format!("{name}@example.com"),
            name,
            "password123",
        ))
        .await?;
    Ok(Actor::from(&user))
}

/// Runs raw SQL against the test database.
///
/// # Errors
///
/// Returns an error if a connection cannot be obtained or the SQL fails.
pub async fn execute_sql(pool: &PgPool, sql: &'static str) -> eyre::Result<()> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || -> eyre::Result<()> {
        let mut conn = pool.get()?;
        conn.batch_execute(sql)?;
        Ok(())
    })
    .await?
}

#[derive(QueryableByName)]
struct RowCount {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

/// Counts stored history rows for `task_id`, bypassing the services.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn history_rows(pool: &PgPool, task_id: TaskId) -> eyre::Result<i64> {
    let pool = pool.clone();
    let rows = tokio::task::spawn_blocking(move || -> eyre::Result<RowCount> {
        let mut conn = pool.get()?;
        let row = diesel::sql_query(
            "SELECT COUNT(*) AS count FROM task_status_history WHERE task_id = $1",
        )
        .bind::<diesel::sql_types::Uuid, _>(task_id.into_inner())
        .get_result::<RowCount>(&mut conn)?;
        Ok(row)
    })
    .await??;
    Ok(rows.count)
}
