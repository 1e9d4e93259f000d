//! Lesson quote bot
//!
//! A Telegram bot that walks a user through a short questionnaire and
//! quotes a monthly lesson price.

mod config;
mod pricing;
mod runtime;
mod state_machine;
mod telegram;

use config::BotConfig;
use pricing::PriceTable;
use runtime::ProductionRuntime;
use std::sync::Arc;
use telegram::TelegramClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lesson_quote_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e
    })?;
    tracing::info!(
        api_url = %config.api_url,
        poll_timeout_secs = config.poll_timeout.as_secs(),
        "Configuration loaded"
    );

    let client = Arc::new(TelegramClient::new(&config)?);
    let manager = Arc::new(ProductionRuntime::new(
        client.clone(),
        Arc::new(PriceTable::STANDARD),
    ));

    // Stop polling on Ctrl-C; in-flight sessions finish their current event
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown requested");
        signal_token.cancel();
    });

    telegram::run_polling(client, manager, shutdown).await;

    Ok(())
}
