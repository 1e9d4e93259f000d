//! Startup configuration from the process environment

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const API_URL_VAR: &str = "TELEGRAM_API_URL";
pub const POLL_TIMEOUT_VAR: &str = "TELEGRAM_POLL_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
/// Telegram caps long-poll timeouts at 50 seconds
const MAX_POLL_TIMEOUT_SECS: u64 = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_TOKEN not set")]
    MissingToken,
    #[error("TELEGRAM_POLL_TIMEOUT_SECS must be a whole number of seconds in 1..=50, got {0:?}")]
    InvalidPollTimeout(String),
}

/// Bot configuration
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub api_url: String,
    pub poll_timeout: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get(TOKEN_VAR).ok_or(ConfigError::MissingToken)?;
        let api_url = get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let poll_timeout = match get(POLL_TIMEOUT_VAR) {
            None => Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| (1..=MAX_POLL_TIMEOUT_SECS).contains(secs))
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidPollTimeout(raw))?,
        };

        Ok(Self {
            token,
            api_url,
            poll_timeout,
        })
    }
}

// Keep the token out of logs and panics
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}
