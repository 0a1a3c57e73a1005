use std::fmt;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl TryFrom<&str> for Username {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let trimmed = trimmed.strip_prefix("/u/").unwrap_or(trimmed);
        let trimmed = trimmed.strip_prefix("u/").unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(CoreError::InvalidUsername("empty username".to_string()));
        }
        if !trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(CoreError::InvalidUsername(trimmed.to_string()));
        }
        Ok(Username(trimmed.to_string()))
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
