use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use flairbot_infra::reddit::{RedditClient, RedditError};

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("login failed: {0}")]
    Login(#[from] RedditError),
}

pub async fn connect(config: &AppConfig) -> Result<RedditClient, WiringError> {
    let http = Client::builder().build()?;
    debug!(username = %config.username, "logging in");
    let client = RedditClient::login(http, &config.credentials()).await?;
    Ok(client)
}
