//! Composition root: builds adapters for the chosen storage mode and wires
//! them into the services behind [`AppState`].

use crate::analytics::services::AnalyticsService;
use crate::config::{AdminArgs, AppConfig, ConfigError, ServeArgs, StorageConfig};
use crate::http::{AppState, router};
use crate::identity::{
    adapters::{
        argon2::Argon2PasswordHasher, jwt::JwtTokenIssuer, memory::InMemoryUserRepository,
        postgres::PostgresUserRepository,
    },
    ports::{PasswordHasher, TokenIssuer, UserRepository},
    services::{AccountError, AccountService, RegisterRequest},
};
use crate::persistence::{PgPool, SchemaError, apply_schema, build_pool};
use crate::task::{
    adapters::{
        memory::InMemoryTaskRepository, postgres::PostgresTaskRepository,
        references::RepositoryReferences,
    },
    ports::{TaskReferences, TaskRepository},
    services::TaskService,
};
use crate::theme::{
    adapters::{memory::InMemoryThemeRepository, postgres::PostgresThemeRepository},
    ports::{ThemeReferences, ThemeRepository},
    services::ThemeCatalogService,
};
use diesel::r2d2::PoolError;
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Errors raised while assembling or running the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The connection pool could not be built.
    #[error("failed to connect to database: {0}")]
    Pool(#[from] PoolError),

    /// The schema could not be applied.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Admin bootstrap failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Binding or serving failed.
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the state for `config`, connecting to and migrating the database
/// in `postgres` mode.
///
/// # Errors
///
/// Returns [`AppError`] for invalid configuration or an unreachable
/// database.
pub async fn build_state(config: &AppConfig) -> Result<AppState, AppError> {
    let tokens = JwtTokenIssuer::new(&config.token_secret()?, config.token_lifetime()?);
    match config.storage()? {
        StorageConfig::Memory => {
            info!("using in-memory storage");
            Ok(in_memory_state(tokens))
        }
        StorageConfig::Postgres {
            database_url,
            pool_size,
        } => {
            let pool = tokio::task::spawn_blocking(move || build_pool(&database_url, pool_size))
                .await
                .map_err(|err| AppError::Io(std::io::Error::other(err)))??;
            apply_schema(&pool).await?;
            info!(pool_size, "using postgres storage");
            Ok(postgres_state(pool, tokens))
        }
    }
}

/// Wires in-memory adapters.
#[must_use]
pub fn in_memory_state(tokens: JwtTokenIssuer) -> AppState {
    assemble(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryThemeRepository::new()),
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(tokens),
    )
}

/// Wires Diesel adapters sharing `pool`.
#[must_use]
pub fn postgres_state(pool: PgPool, tokens: JwtTokenIssuer) -> AppState {
    assemble(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresThemeRepository::new(pool.clone())),
        Arc::new(PostgresTaskRepository::new(pool)),
        Arc::new(tokens),
    )
}

fn assemble<T>(
    users: Arc<dyn UserRepository>,
    themes: Arc<dyn ThemeRepository>,
    tasks: Arc<T>,
    tokens: Arc<dyn TokenIssuer>,
) -> AppState
where
    T: TaskRepository + ThemeReferences + 'static,
{
    let clock = Arc::new(DefaultClock);
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let task_repository: Arc<dyn TaskRepository> = tasks.clone();
    let detacher: Arc<dyn ThemeReferences> = tasks;
    let references: Arc<dyn TaskReferences> = Arc::new(RepositoryReferences::new(
        Arc::clone(&users),
        Arc::clone(&themes),
    ));

    AppState {
        accounts: AccountService::new(users, hasher, tokens, Arc::clone(&clock)),
        themes: ThemeCatalogService::new(themes, detacher, Arc::clone(&clock)),
        tasks: TaskService::new(Arc::clone(&task_repository), references, Arc::clone(&clock)),
        analytics: AnalyticsService::new(task_repository, clock),
    }
}

/// Serves the HTTP API on `config.listen` until interrupted.
///
/// # Errors
///
/// Returns [`AppError::Io`] when the listener cannot bind or the server
/// fails.
pub async fn serve(config: &AppConfig, state: AppState) -> Result<(), AppError> {
    let listener = TcpListener::bind(config.listen).await?;
    info!(address = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
    }
}

/// Builds the state for `serve`, ensuring the startup administrator when
/// `args` carries credentials.
///
/// # Errors
///
/// Returns [`AppError`] when the state cannot be built or the administrator
/// cannot be created.
pub async fn startup_state(config: &AppConfig, args: &ServeArgs) -> Result<AppState, AppError> {
    let state = build_state(config).await?;
    if let Some(admin) = args.bootstrap_admin() {
        ensure_admin(&state, admin).await?;
    }
    Ok(state)
}

/// Creates the administrator described by `args` in durable storage unless
/// the email exists.
///
/// # Errors
///
/// Returns [`ConfigError::EphemeralStorage`] for memory storage and
/// [`AppError::Account`] for invalid credentials or persistence failure.
pub async fn create_admin(config: &AppConfig, args: AdminArgs) -> Result<(), AppError> {
    config.durable_storage()?;
    let state = build_state(config).await?;
    ensure_admin(&state, args).await
}

async fn ensure_admin(state: &AppState, args: AdminArgs) -> Result<(), AppError> {
    let (user, created) = state
        .accounts
        .ensure_admin(RegisterRequest::new(args.email, args.username, args.password))
        .await?;
    if created {
        info!(user_id = %user.id(), "admin account created");
    } else {
        info!(user_id = %user.id(), "admin account already exists");
    }
    Ok(())
}
