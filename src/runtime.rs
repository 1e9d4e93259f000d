//! Runtime for executing quote sessions
//!
//! Each conversant gets a dedicated task that owns its session, so events
//! for one conversant are processed strictly in order while different
//! conversants never contend.

mod executor;
pub mod traits;


pub use executor::{Session, SessionCommand, SessionRuntime};
pub use traits::*;

use crate::pricing::PriceTable;
use crate::state_machine::{CallbackAction, Event, SessionContext};
use crate::telegram::TelegramClient;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = RuntimeManager<TelegramClient>;

/// Queue depth per session. A full queue drops the event rather than
/// stalling intake for every other conversant.
const SESSION_QUEUE_DEPTH: usize = 32;

/// Kinds of inbound events the transport delivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    TextMessage,
    ButtonCallback,
    StartCommand,
    CancelCommand,
}

/// Transport-neutral inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub conversant: ConversantId,
    pub kind: InboundKind,
    pub payload: String,
    /// The user's own message carrying the event, tracked for cleanup
    pub message_id: Option<MessageId>,
}

impl InboundEvent {
    pub fn new(conversant: ConversantId, kind: InboundKind, payload: impl Into<String>) -> Self {
        Self {
            conversant,
            kind,
            payload: payload.into(),
            message_id: None,
        }
    }

    pub fn with_message_id(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    /// Map to a state machine event. Unknown callback tokens yield `None`.
    pub fn to_event(&self) -> Option<Event> {
        match self.kind {
            InboundKind::TextMessage => Some(Event::user_text(&self.payload)),
            InboundKind::StartCommand => Some(Event::Start),
            InboundKind::CancelCommand => Some(Event::Cancel),
            InboundKind::ButtonCallback => match self.payload.parse::<CallbackAction>() {
                Ok(action) => Some(action.into()),
                Err(unknown) => {
                    tracing::debug!(token = %unknown.0, "Unknown callback token");
                    None
                }
            },
        }
    }
}

/// Errors surfaced for a single processed event
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Failed to send message: {0}")]
    Send(#[source] SinkError),
    #[error("Session runtime is no longer running")]
    SessionClosed,
    #[error("Session queue is full, event dropped")]
    SessionBusy,
}

/// What happened to a submitted event
#[derive(Debug)]
pub enum Submitted {
    /// Queued for the conversant's session; resolves once processed
    Queued(oneshot::Receiver<Result<(), RuntimeError>>),
    /// Dropped without reaching any session
    Ignored,
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub command_tx: mpsc::Sender<SessionCommand>,
}

/// Manager for all quote sessions
pub struct RuntimeManager<K>
where
    K: MessageSink + 'static,
{
    sink: Arc<K>,
    prices: Arc<PriceTable>,
    /// Sessions live for the whole process; entries and their tasks are never evicted
    sessions: RwLock<HashMap<ConversantId, SessionHandle>>,
}

impl<K> RuntimeManager<K>
where
    K: MessageSink + 'static,
{
    pub fn new(sink: Arc<K>, prices: Arc<PriceTable>) -> Self {
        Self {
            sink,
            prices,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Number of conversants with a live session
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Route an event to its conversant's session.
    ///
    /// Only Start and Restart open a session; anything else for an unknown
    /// conversant is ignored. Events are enqueued in call order and never
    /// wait for queue space.
    pub async fn submit(&self, inbound: InboundEvent) -> Result<Submitted, RuntimeError> {
        let Some(event) = inbound.to_event() else {
            return Ok(Submitted::Ignored);
        };

        let handle = if event.opens_session() {
            self.get_or_create(inbound.conversant).await
        } else {
            match self.get(inbound.conversant).await {
                Some(handle) => handle,
                None => {
                    tracing::debug!(
                        conversant = %inbound.conversant,
                        kind = ?inbound.kind,
                        "No session for conversant, ignoring event"
                    );
                    return Ok(Submitted::Ignored);
                }
            }
        };

        let (reply, reply_rx) = oneshot::channel();
        handle
            .command_tx
            .try_send(SessionCommand::Event {
                event,
                inbound_message: inbound.message_id,
                reply,
            })
            .map_err(|e| match e {
                TrySendError::Full(_) => RuntimeError::SessionBusy,
                TrySendError::Closed(_) => RuntimeError::SessionClosed,
            })?;
        Ok(Submitted::Queued(reply_rx))
    }

    /// Submit an event and wait until it has been processed
    #[cfg(test)]
    pub async fn dispatch(&self, inbound: InboundEvent) -> Result<(), RuntimeError> {
        match self.submit(inbound).await? {
            Submitted::Queued(reply_rx) => reply_rx.await.map_err(|_| RuntimeError::SessionClosed)?,
            Submitted::Ignored => Ok(()),
        }
    }

    async fn get(&self, conversant: ConversantId) -> Option<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(&conversant)
            .filter(|handle| !handle.command_tx.is_closed())
            .cloned()
    }

    /// Get or create a session runtime for a conversant
    async fn get_or_create(&self, conversant: ConversantId) -> SessionHandle {
        if let Some(handle) = self.get(conversant).await {
            return handle;
        }

        let mut sessions = self.sessions.write().await;
        // Another submitter may have won the race for the write lock
        if let Some(handle) = sessions.get(&conversant) {
            if !handle.command_tx.is_closed() {
                return handle.clone();
            }
        }

        let (command_tx, command_rx) = mpsc::channel(SESSION_QUEUE_DEPTH);
        let session = Session::new(conversant, SessionContext::new(self.prices.clone()));
        let runtime = SessionRuntime::new(session, self.sink.clone(), command_rx);
        tokio::spawn(runtime.run());

        tracing::info!(conversant = %conversant, "Session created");
        let handle = SessionHandle { command_tx };
        sessions.insert(conversant, handle.clone());
        handle
    }
}
