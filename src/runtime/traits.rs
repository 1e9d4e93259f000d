//! Trait abstractions for runtime I/O
//!
//! The transport sits behind `MessageSink` so the session runtime can be
//! driven by mock implementations in tests.

use crate::state_machine::OutboundMessage;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Identity of the person (chat) a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversantId(pub i64);

impl fmt::Display for ConversantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-assigned id of a delivered message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a delete request that reached the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Transport failure with classification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SinkError {
    pub kind: SinkErrorKind,
    pub message: String,
}

impl SinkError {
    pub fn new(kind: SinkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SinkErrorKind::Network, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(SinkErrorKind::Rejected, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorKind {
    /// Transport unreachable, timeouts, undecodable responses
    Network,
    /// Transport answered but refused the request
    Rejected,
}

/// Outbound message delivery
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver a message, returning the id the transport assigned to it
    async fn send_text(
        &self,
        conversant: ConversantId,
        message: &OutboundMessage,
    ) -> Result<MessageId, SinkError>;

    /// Delete a previously delivered message
    async fn delete_message(
        &self,
        conversant: ConversantId,
        message_id: MessageId,
    ) -> Result<DeleteOutcome, SinkError>;
}

#[async_trait]
impl<T: MessageSink + ?Sized> MessageSink for Arc<T> {
    async fn send_text(
        &self,
        conversant: ConversantId,
        message: &OutboundMessage,
    ) -> Result<MessageId, SinkError> {
        (**self).send_text(conversant, message).await
    }

    async fn delete_message(
        &self,
        conversant: ConversantId,
        message_id: MessageId,
    ) -> Result<DeleteOutcome, SinkError> {
        (**self).delete_message(conversant, message_id).await
    }
}
