//! Global `tracing` subscriber setup.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive is malformed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("failed to install subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Installs a formatted subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter does not parse or a global
/// subscriber already exists.
pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}
