//! Quote session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition` maps a state and an event to a new state plus the effects
//! the runtime must perform.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{ActionButton, Effect, Keyboard, OutboundMessage};
pub use event::{CallbackAction, Event};
pub use state::{SessionContext, SessionState};
pub use transition::transition;
#[cfg(test)]
pub use transition::TransitionError;
