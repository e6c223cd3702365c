//! Process configuration from command-line flags and environment variables.
//!
//! `main` loads `.env` (if present), parses [`Cli`] once and hands the
//! resulting [`AppConfig`] down by reference.

use chrono::Duration;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use thiserror::Error;

/// Minimum accepted length of `SECRET_KEY` outside development mode.
pub const MIN_SECRET_LEN: usize = 32;

/// Task tracking service with an audited status transition engine.
#[derive(Debug, Clone, Parser)]
#[command(name = "tasktrack", version, about)]
pub struct Cli {
    /// Shared settings.
    #[command(flatten)]
    pub config: AppConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    Serve(ServeArgs),
    /// Create an administrator account unless the email is already taken.
    CreateAdmin(AdminArgs),
}

/// Credentials for the `create-admin` subcommand.
#[derive(Debug, Clone, Args)]
pub struct AdminArgs {
    /// Login email.
    #[arg(long, env = "ADMIN_EMAIL")]
    pub email: String,

    /// Display name.
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub username: String,

    /// Plain password, hashed before storage.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Options for the `serve` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Email of an administrator ensured at startup.
    #[arg(long = "admin-email", env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Display name for the startup administrator.
    #[arg(long = "admin-username", env = "ADMIN_USERNAME", default_value = "admin")]
    pub admin_username: String,

    /// Password for the startup administrator.
    #[arg(long = "admin-password", env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

impl ServeArgs {
    /// Returns the startup administrator when both email and password are
    /// set.
    #[must_use]
    pub fn bootstrap_admin(&self) -> Option<AdminArgs> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some(AdminArgs {
                email: email.clone(),
                username: self.admin_username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

/// Storage adapter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageMode {
    /// Process-local maps; data is lost on exit.
    Memory,
    /// Diesel adapters over an r2d2 pool.
    Postgres,
}

/// Resolved storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// In-memory adapters.
    Memory,
    /// `PostgreSQL` adapters.
    Postgres {
        /// Connection URL.
        database_url: String,
        /// Maximum pool size.
        pool_size: u32,
    },
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Storage mode; defaults to `postgres` when `DATABASE_URL` is set and
    /// `memory` otherwise.
    #[arg(long, env = "STORAGE", value_enum)]
    pub storage: Option<StorageMode>,

    /// `PostgreSQL` connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 10)]
    pub database_pool_size: u32,

    /// HMAC key for signing access tokens.
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Access token lifetime in minutes.
    #[arg(long, env = "ACCESS_TOKEN_EXPIRE_MINUTES", default_value_t = 30)]
    pub access_token_expire_minutes: u32,

    /// Address the HTTP server binds to.
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,

    /// Default `tracing` filter; `RUST_LOG` takes precedence.
    #[arg(long, env = "LOG_FILTER", default_value = "tasktrack=info,tower_http=info")]
    pub log_filter: String,

    /// Relax secret requirements for local development.
    #[arg(long, env = "DEV_MODE")]
    pub dev_mode: bool,
}

/// Configuration values that cannot be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `SECRET_KEY` is unset outside development mode.
    #[error("SECRET_KEY is required unless --dev-mode is set")]
    MissingSecret,

    /// `SECRET_KEY` is too short outside development mode.
    #[error("SECRET_KEY must be at least {min} characters")]
    WeakSecret {
        /// Required minimum length.
        min: usize,
    },

    /// `postgres` storage was requested without a URL.
    #[error("DATABASE_URL is required for postgres storage")]
    MissingDatabaseUrl,

    /// The pool size is zero.
    #[error("DATABASE_POOL_SIZE must be positive")]
    EmptyPool,

    /// The token lifetime is zero.
    #[error("ACCESS_TOKEN_EXPIRE_MINUTES must be positive")]
    InvalidTokenLifetime,

    /// An operation that must outlive the process was given memory storage.
    #[error("create-admin requires postgres storage; in-memory accounts are lost on exit")]
    EphemeralStorage,
}

impl AppConfig {
    /// Resolves the storage adapters to build.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] for `postgres` without a
    /// URL and [`ConfigError::EmptyPool`] for a zero pool size.
    pub fn storage(&self) -> Result<StorageConfig, ConfigError> {
        let mode = self.storage.unwrap_or(if self.database_url.is_some() {
            StorageMode::Postgres
        } else {
            StorageMode::Memory
        });
        match mode {
            StorageMode::Memory => Ok(StorageConfig::Memory),
            StorageMode::Postgres => {
                let database_url = self
                    .database_url
                    .clone()
                    .ok_or(ConfigError::MissingDatabaseUrl)?;
                if self.database_pool_size == 0 {
                    return Err(ConfigError::EmptyPool);
                }
                Ok(StorageConfig::Postgres {
                    database_url,
                    pool_size: self.database_pool_size,
                })
            }
        }
    }

    /// Resolves storage that outlives the process.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EphemeralStorage`] when the resolved mode is
    /// `memory`, plus the errors of [`AppConfig::storage`].
    pub fn durable_storage(&self) -> Result<StorageConfig, ConfigError> {
        match self.storage()? {
            StorageConfig::Memory => Err(ConfigError::EphemeralStorage),
            postgres @ StorageConfig::Postgres { .. } => Ok(postgres),
        }
    }

    /// Returns the token signing key.
    ///
    /// In development mode a missing key is replaced by a random one, so
    /// tokens do not survive a restart.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] or [`ConfigError::WeakSecret`]
    /// outside development mode.
    pub fn token_secret(&self) -> Result<Vec<u8>, ConfigError> {
        match self.secret_key.as_deref() {
            Some(secret) if self.dev_mode || secret.chars().count() >= MIN_SECRET_LEN => {
                Ok(secret.as_bytes().to_vec())
            }
            Some(_) => Err(ConfigError::WeakSecret {
                min: MIN_SECRET_LEN,
            }),
            None if self.dev_mode => Ok(format!(
                "{}{}",
                uuid::Uuid::new_v4().simple(),
                uuid::Uuid::new_v4().simple()
            )
            .into_bytes()),
            None => Err(ConfigError::MissingSecret),
        }
    }

    /// Returns the access token lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTokenLifetime`] for zero minutes.
    pub fn token_lifetime(&self) -> Result<Duration, ConfigError> {
        if self.access_token_expire_minutes == 0 {
            return Err(ConfigError::InvalidTokenLifetime);
        }
        Ok(Duration::minutes(i64::from(self.access_token_expire_minutes)))
    }
}
