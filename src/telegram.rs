//! Telegram Bot API transport
//!
//! Turns Telegram updates into inbound session events and delivers the
//! session's outbound messages back through the Bot API.

mod client;
mod error;
mod poller;
mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use poller::run_polling;
