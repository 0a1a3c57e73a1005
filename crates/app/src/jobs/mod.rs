pub mod tasks;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("forum error: {0}")]
    Forum(#[from] flairbot_infra::reddit::RedditError),
}
