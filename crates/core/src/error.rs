use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid username: {0}")]
    InvalidUsername(String),
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
