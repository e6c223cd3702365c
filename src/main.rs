//! `tasktrack` binary: serves the HTTP API or bootstraps an admin account.

use clap::Parser;
use tasktrack::app::{self, AppError};
use tasktrack::config::{Cli, Command};
use tasktrack::telemetry::{self, TelemetryError};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    App(#[from] AppError),
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        return Err(MainError::App(AppError::Io(std::io::Error::other(err))));
    }
    let cli = Cli::parse();
    telemetry::init(&cli.config.log_filter)?;

    let result = run(cli).await;
    if let Err(ref err) = result {
        error!(error = %err, "tasktrack exited with an error");
    }
    result.map_err(MainError::from)
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Serve(args) => {
            let state = app::startup_state(&cli.config, &args).await?;
            app::serve(&cli.config, state).await
        }
        Command::CreateAdmin(args) => app::create_admin(&cli.config, args).await,
    }
}
