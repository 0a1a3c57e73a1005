pub mod comments;
pub mod flair;
