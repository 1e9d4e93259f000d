//! Session executor
//!
//! `Session` applies events to one conversant's state and performs the
//! resulting effects; `SessionRuntime` owns a session and feeds it queued
//! commands one at a time.

use super::traits::{ConversantId, DeleteOutcome, MessageId, MessageSink};
use super::RuntimeError;
use crate::state_machine::{transition, Effect, Event, SessionContext, SessionState};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// One conversant's quote session plus the ids of every message it produced
#[derive(Debug, Clone)]
pub struct Session {
    conversant: ConversantId,
    context: SessionContext,
    state: SessionState,
    /// Inbound and outbound message ids, deleted on reset
    history: Vec<MessageId>,
}

impl Session {
    pub fn new(conversant: ConversantId, context: SessionContext) -> Self {
        Self {
            conversant,
            context,
            state: SessionState::default(),
            history: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn history(&self) -> &[MessageId] {
        &self.history
    }

    /// Process one event to completion.
    ///
    /// The new state is committed only after every effect succeeded, so a
    /// failed send leaves the session where it was. `inbound_message` is the
    /// user's own message that carried the event, if any; it is tracked for
    /// cleanup whatever the outcome.
    pub async fn process_event<S: MessageSink + ?Sized>(
        &mut self,
        sink: &S,
        event: Event,
        inbound_message: Option<MessageId>,
    ) -> Result<(), RuntimeError> {
        let outcome = self.apply(sink, event).await;
        if let Some(id) = inbound_message {
            self.history.push(id);
        }
        outcome
    }

    async fn apply<S: MessageSink + ?Sized>(
        &mut self,
        sink: &S,
        event: Event,
    ) -> Result<(), RuntimeError> {
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    conversant = %self.conversant,
                    state = self.state.name(),
                    reason = %e,
                    "Event ignored"
                );
                return Ok(());
            }
        };

        for effect in result.effects {
            self.execute_effect(sink, effect).await?;
        }

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        if old_state.name() != self.state.name() {
            tracing::info!(
                conversant = %self.conversant,
                from = old_state.name(),
                to = self.state.name(),
                "Session transition"
            );
        }
        if let SessionState::Done { quote, .. } = &self.state {
            tracing::info!(
                conversant = %self.conversant,
                city = %quote.city,
                students = quote.students.get(),
                lessons = quote.lessons,
                forecast = quote.forecast,
                tier = %quote.tier,
                total = quote.total,
                "Quote produced"
            );
        }
        Ok(())
    }

    async fn execute_effect<S: MessageSink + ?Sized>(
        &mut self,
        sink: &S,
        effect: Effect,
    ) -> Result<(), RuntimeError> {
        match effect {
            Effect::Send(message) => {
                let id = sink
                    .send_text(self.conversant, &message)
                    .await
                    .map_err(RuntimeError::Send)?;
                self.history.push(id);
                Ok(())
            }

            Effect::PurgeHistory => {
                let ids = std::mem::take(&mut self.history);
                if !ids.is_empty() {
                    tracing::debug!(
                        conversant = %self.conversant,
                        count = ids.len(),
                        "Purging session messages"
                    );
                }
                for id in ids {
                    match sink.delete_message(self.conversant, id).await {
                        Ok(DeleteOutcome::Deleted) => {}
                        Ok(DeleteOutcome::NotFound) => {
                            tracing::debug!(
                                conversant = %self.conversant,
                                message_id = %id,
                                "Message already gone"
                            );
                        }
                        Err(e) => {
                            tracing::debug!(
                                conversant = %self.conversant,
                                message_id = %id,
                                error = %e,
                                "Failed to delete message, ignoring"
                            );
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Commands accepted by a running session
#[derive(Debug)]
pub enum SessionCommand {
    Event {
        event: Event,
        inbound_message: Option<MessageId>,
        reply: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Task that owns one session and processes its commands in order
pub struct SessionRuntime<K>
where
    K: MessageSink + 'static,
{
    session: Session,
    sink: Arc<K>,
    command_rx: mpsc::Receiver<SessionCommand>,
}

impl<K> SessionRuntime<K>
where
    K: MessageSink + 'static,
{
    pub fn new(session: Session, sink: Arc<K>, command_rx: mpsc::Receiver<SessionCommand>) -> Self {
        Self {
            session,
            sink,
            command_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(conversant = %self.session.conversant, "Starting session runtime");

        // One command at a time - no interleaving within a session
        while let Some(command) = self.command_rx.recv().await {
            match command {
                SessionCommand::Event {
                    event,
                    inbound_message,
                    reply,
                } => {
                    let outcome = self
                        .session
                        .process_event(&self.sink, event, inbound_message)
                        .await;
                    // The submitter may have stopped waiting
                    let _ = reply.send(outcome);
                }
            }
        }

        tracing::debug!(conversant = %self.session.conversant, "Session runtime stopped");
    }
}
