//! Telegram transport error types

use crate::runtime::SinkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Request never produced a decodable response. The URL (which embeds
    /// the bot token) is stripped before the error is stored.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("Telegram API reported success without a result")]
    MissingResult,
}

impl TelegramError {
    /// Whether a delete failed because the message no longer exists
    pub fn is_not_found(&self) -> bool {
        match self {
            TelegramError::Api { description, .. } => {
                description.to_ascii_lowercase().contains("not found")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Http(err.without_url())
    }
}

impl From<TelegramError> for SinkError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::Api { .. } => SinkError::rejected(err.to_string()),
            TelegramError::Http(_) | TelegramError::MissingResult => {
                SinkError::network(err.to_string())
            }
        }
    }
}
