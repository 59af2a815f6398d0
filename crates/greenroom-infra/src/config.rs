//! Environment-based configuration.

use thiserror::Error;

use crate::sqlite::pool::default_database_url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Credentials for the LINE Messaging API channel.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Channel secret; HMAC key for webhook signature verification.
    pub channel_secret: String,
    /// Long-lived channel access token for the send APIs.
    pub channel_access_token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub line: LineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. `from_env` goes through
    /// here; tests pass a closure instead of mutating process env.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            get("GREENROOM_DATABASE_URL").unwrap_or_else(default_database_url);
        let channel_secret = get("GREENROOM_CHANNEL_SECRET")
            .ok_or(ConfigError::MissingVar("GREENROOM_CHANNEL_SECRET"))?;
        let channel_access_token = get("GREENROOM_CHANNEL_ACCESS_TOKEN")
            .ok_or(ConfigError::MissingVar("GREENROOM_CHANNEL_ACCESS_TOKEN"))?;

        Ok(Self {
            database_url,
            line: LineConfig {
                channel_secret,
                channel_access_token,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(|name| {
            Some(match name {
                "GREENROOM_DATABASE_URL" => "sqlite:///tmp/x.db".to_string(),
                "GREENROOM_CHANNEL_SECRET" => "secret".to_string(),
                "GREENROOM_CHANNEL_ACCESS_TOKEN" => "token".to_string(),
                _ => return None,
            })
        })
        .unwrap();
        assert_eq!(config.database_url, "sqlite:///tmp/x.db");
        assert_eq!(config.line.channel_secret, "secret");
    }

    #[test]
    fn database_url_falls_back_to_default() {
        let config = Config::from_lookup(|name| match name {
            "GREENROOM_CHANNEL_SECRET" => Some("secret".to_string()),
            "GREENROOM_CHANNEL_ACCESS_TOKEN" => Some("token".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(config.database_url.starts_with("sqlite://"));
    }

    #[test]
    fn missing_channel_secret_is_an_error() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("GREENROOM_CHANNEL_SECRET"));
    }
}
