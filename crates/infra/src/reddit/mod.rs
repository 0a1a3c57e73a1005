mod client;
mod forest;
mod listing;

use async_trait::async_trait;
use thiserror::Error;

use flairbot_core::domain::comments::{Comment, Submission};

pub use client::{Credentials, RedditClient};

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("missing data: {0}")]
    MissingData(&'static str),
}

#[async_trait]
pub trait ForumClient: Send + Sync {
    async fn fetch_submission(&self, submission_id: &str) -> Result<Submission, RedditError>;

    async fn expand_all_comments(&self, submission: &mut Submission) -> Result<(), RedditError>;

    async fn set_flair(
        &self,
        community: &str,
        author: &str,
        text: &str,
        css_class: &str,
    ) -> Result<(), RedditError>;

    async fn post_reply(&self, comment: &Comment, text: &str) -> Result<(), RedditError>;
}
