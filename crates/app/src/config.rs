use std::path::Path;

use thiserror::Error;

use flairbot_core::domain::flair::FlairPolicy;
use flairbot_core::types::pattern::ExtractPattern;
use flairbot_core::types::username::Username;
use flairbot_infra::reddit::Credentials;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub username: Username,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub subreddit: String,
    pub link_id: String,
    pub reply: Option<String>,
    pub pattern: ExtractPattern,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let username_raw = required("FLAIRBOT_USERNAME")?;
        let username = Username::try_from(username_raw.as_str())
            .map_err(|err| ConfigError::InvalidValue("FLAIRBOT_USERNAME", err.to_string()))?;
        let password = required("FLAIRBOT_PASSWORD")?;
        let client_id = required("FLAIRBOT_CLIENT_ID")?;
        let client_secret = required("FLAIRBOT_CLIENT_SECRET")?;
        let subreddit = normalize_subreddit(&required("FLAIRBOT_SUBREDDIT")?);
        if subreddit.is_empty() {
            return Err(ConfigError::InvalidValue("FLAIRBOT_SUBREDDIT", subreddit));
        }
        let link_id_raw = required("FLAIRBOT_LINK_ID")?;
        let link_id = link_id_raw
            .strip_prefix("t3_")
            .unwrap_or(&link_id_raw)
            .to_string();
        if link_id.is_empty() || !link_id.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidValue("FLAIRBOT_LINK_ID", link_id_raw));
        }
        let pattern_raw = lookup("FLAIRBOT_REGEX").unwrap_or_default();
        if pattern_raw.is_empty() {
            return Err(ConfigError::Missing("FLAIRBOT_REGEX"));
        }
        let pattern = ExtractPattern::try_from(pattern_raw.as_str())
            .map_err(|err| ConfigError::InvalidValue("FLAIRBOT_REGEX", err.to_string()))?;
        let reply = lookup("FLAIRBOT_REPLY").filter(|value| !value.trim().is_empty());
        let user_agent = lookup("FLAIRBOT_USER_AGENT")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| username.to_string());

        Ok(Self {
            username,
            password,
            client_id,
            client_secret,
            user_agent,
            subreddit,
            link_id,
            reply,
            pattern,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            username: self.username.to_string(),
            password: self.password.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn policy(&self) -> FlairPolicy {
        FlairPolicy::new(
            self.username.clone(),
            self.pattern.clone(),
            self.reply.clone(),
        )
    }
}

fn normalize_subreddit(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    trimmed.strip_prefix("r/").unwrap_or(trimmed).to_string()
}

pub fn load_dotenv(path: &Path) -> Result<(), std::io::Error> {
    if !path.exists() {
        return Ok(());
    }
    let contents = std::fs::read_to_string(path)?;
    for (key, value) in contents.lines().filter_map(parse_dotenv_line) {
        if std::env::var_os(&key).is_none() {
            // Safety: invoked during startup before the runtime spawns any threads.
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
    Ok(())
}

fn parse_dotenv_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), unquote(value.trim())))
}

fn unquote(value: &str) -> String {
    if let Some(inner) = value.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        let mut output = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                output.push(ch);
                continue;
            }
            match chars.next() {
                Some('n') => output.push('\n'),
                Some('r') => output.push('\r'),
                Some('t') => output.push('\t'),
                Some('"') => output.push('"'),
                Some('\\') => output.push('\\'),
                Some(other) => {
                    output.push('\\');
                    output.push(other);
                }
                None => output.push('\\'),
            }
        }
        return output;
    }
    if let Some(inner) = value.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
        return inner.to_string();
    }
    value.to_string()
}
