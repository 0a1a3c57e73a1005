use std::fmt;

use regex::Regex;

use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct ExtractPattern(Regex);

impl ExtractPattern {
    pub fn first_match<'a>(&self, haystack: &'a str) -> Option<&'a str> {
        self.0.find(haystack).map(|found| found.as_str())
    }
}

impl TryFrom<&str> for ExtractPattern {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(ExtractPattern(Regex::new(value)?))
    }
}

impl fmt::Display for ExtractPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
