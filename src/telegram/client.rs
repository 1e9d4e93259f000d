//! Telegram Bot API client

use super::types::{
    AnswerCallbackQuery, ApiResponse, DeleteMessage, GetUpdates, Message, SendMessage, Update,
};
use super::TelegramError;
use crate::config::BotConfig;
use crate::runtime::{ConversantId, DeleteOutcome, MessageId, MessageSink, SinkError};
use crate::state_machine::OutboundMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const ALLOWED_UPDATES: [&str; 2] = ["message", "callback_query"];

/// Slack on top of the long-poll timeout before the HTTP request gives up
const REQUEST_GRACE: Duration = Duration::from_secs(10);

/// Bot API client bound to one bot token
pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`; never logged
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(config.poll_timeout + REQUEST_GRACE)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
            poll_timeout: config.poll_timeout,
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/{method}", self.base_url);
        // Error statuses still carry the JSON envelope with the reason
        let response = self.client.post(&url).json(params).send().await?;
        let envelope: ApiResponse<R> = response.json().await?;
        envelope.into_result()
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdates {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &ALLOWED_UPDATES,
        };
        self.call("getUpdates", &params).await
    }

    pub async fn send_message(&self, request: &SendMessage) -> Result<Message, TelegramError> {
        self.call("sendMessage", request).await
    }

    pub async fn delete_message(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<bool, TelegramError> {
        self.call(
            "deleteMessage",
            &DeleteMessage {
                chat_id,
                message_id,
            },
        )
        .await
    }

    /// Stop the client-side spinner on a pressed inline button
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<bool, TelegramError> {
        self.call(
            "answerCallbackQuery",
            &AnswerCallbackQuery { callback_query_id },
        )
        .await
    }
}

#[async_trait]
impl MessageSink for TelegramClient {
    async fn send_text(
        &self,
        conversant: ConversantId,
        message: &OutboundMessage,
    ) -> Result<MessageId, SinkError> {
        let request = SendMessage::new(conversant.0, message);
        match self.send_message(&request).await {
            Ok(sent) => Ok(MessageId(sent.message_id)),
            Err(e) => {
                tracing::warn!(conversant = %conversant, error = %e, "sendMessage failed");
                Err(e.into())
            }
        }
    }

    async fn delete_message(
        &self,
        conversant: ConversantId,
        message_id: MessageId,
    ) -> Result<DeleteOutcome, SinkError> {
        match TelegramClient::delete_message(self, conversant.0, message_id.0).await {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(e) if e.is_not_found() => Ok(DeleteOutcome::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
