//! Long-polling loop feeding Telegram updates into the session runtime

use super::types::Update;
use super::TelegramClient;
use crate::runtime::{
    ConversantId, InboundEvent, InboundKind, MessageId, MessageSink, RuntimeError, RuntimeManager,
    Submitted,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Normalize an update into the transport-neutral event shape.
///
/// Returns `None` for updates the bot does not react to: non-text messages,
/// unknown commands, callbacks without data or without their message.
pub fn normalize(update: &Update) -> Option<InboundEvent> {
    if let Some(message) = &update.message {
        let text = message.text.as_deref()?.trim();
        let conversant = ConversantId(message.chat.id);
        let kind = if let Some(command) = text.strip_prefix('/') {
            match command_name(command) {
                "start" => InboundKind::StartCommand,
                "cancel" => InboundKind::CancelCommand,
                _ => return None,
            }
        } else {
            InboundKind::TextMessage
        };
        return Some(
            InboundEvent::new(conversant, kind, text)
                .with_message_id(MessageId(message.message_id)),
        );
    }

    let query = update.callback_query.as_ref()?;
    let data = query.data.as_deref()?;
    let chat = &query.message.as_ref()?.chat;
    Some(InboundEvent::new(
        ConversantId(chat.id),
        InboundKind::ButtonCallback,
        data,
    ))
}

/// `start@my_bot payload` -> `start`
fn command_name(command: &str) -> &str {
    let name = command.split_whitespace().next().unwrap_or_default();
    name.split('@').next().unwrap_or_default()
}

fn backoff(failures: u32) -> Duration {
    // 1s, 2s, 4s ... capped
    let secs = 1u64 << failures.saturating_sub(1).min(5);
    Duration::from_secs(secs).min(MAX_BACKOFF)
}

/// Poll until `shutdown` is cancelled
pub async fn run_polling<K>(
    client: Arc<TelegramClient>,
    manager: Arc<RuntimeManager<K>>,
    shutdown: CancellationToken,
) where
    K: MessageSink + 'static,
{
    let mut offset: Option<i64> = None;
    let mut failures: u32 = 0;

    tracing::info!("Polling for updates");

    loop {
        let updates = tokio::select! {
            () = shutdown.cancelled() => break,
            result = client.get_updates(offset) => result,
        };

        let updates = match updates {
            Ok(updates) => {
                failures = 0;
                updates
            }
            Err(e) => {
                failures += 1;
                let delay = backoff(failures);
                tracing::warn!(
                    error = %e,
                    failures,
                    delay_secs = delay.as_secs(),
                    "getUpdates failed, backing off"
                );
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(delay) => continue,
                }
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            if let Some(query) = &update.callback_query {
                if let Err(e) = client.answer_callback_query(&query.id).await {
                    tracing::debug!(error = %e, "answerCallbackQuery failed");
                }
            }

            let Some(inbound) = normalize(&update) else {
                tracing::debug!(update_id = update.update_id, "Skipping update");
                continue;
            };
            let conversant = inbound.conversant;

            match manager.submit(inbound).await {
                Ok(Submitted::Queued(reply_rx)) => {
                    // Wait off the polling loop; order is already fixed by the queue
                    tokio::spawn(async move {
                        match reply_rx.await {
                            Ok(Ok(())) => {}
                            Ok(Err(e)) => {
                                tracing::error!(conversant = %conversant, error = %e, "Failed to process event");
                            }
                            Err(_) => {
                                tracing::error!(conversant = %conversant, "Session dropped event");
                            }
                        }
                    });
                }
                Ok(Submitted::Ignored) => {}
                Err(RuntimeError::SessionBusy) => {
                    tracing::warn!(conversant = %conversant, "Session queue full, dropping event");
                }
                Err(e) => {
                    tracing::error!(conversant = %conversant, error = %e, "Failed to submit event");
                }
            }
        }
    }

    tracing::info!(
        sessions = manager.session_count().await,
        "Polling stopped"
    );
}
