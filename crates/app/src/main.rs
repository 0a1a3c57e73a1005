mod cli;
mod config;
mod jobs;
mod wiring;

use std::path::Path;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{AppConfig, ConfigError};
use crate::jobs::JobError;
use crate::jobs::tasks::flair_assignment;
use crate::wiring::WiringError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),
    #[error("job error: {0}")]
    Jobs(#[from] JobError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let _cli = Cli::parse();
    if let Err(err) = run().await {
        error!(error = %err, "flair run aborted");
        return Err(err);
    }
    Ok(())
}

async fn run() -> Result<(), AppError> {
    config::load_dotenv(Path::new(".env"))?;
    let config = AppConfig::from_env()?;
    let client = wiring::connect(&config).await?;
    let policy = config.policy();
    info!(
        subreddit = %config.subreddit,
        link_id = %config.link_id,
        pattern = %config.pattern,
        "flair run starting"
    );
    let stats = flair_assignment::run(&client, &policy, &config.subreddit, &config.link_id).await?;
    info!(?stats, "flair run complete");
    Ok(())
}
