pub mod pattern;
pub mod username;
