//! Effects produced by state transitions

use super::event::CallbackAction;
use crate::pricing::{City, Quote};

const CITY_PROMPT: &str = "🇱🇹📍 Choose city:";
const CITY_RETRY: &str = "Please choose from the keyboard.";
const STUDENTS_PROMPT: &str = "👥 How many students attend the lesson?";
const DATE_PROMPT: &str = "📅 Enter the date of the first lesson (DD.MM.YYYY or YYYY-MM-DD):";
const DATE_INVALID: &str = "❗ Invalid date. Try again.";
const DATE_OUT_OF_RANGE: &str = "❗ Date out of range.";
const LESSONS_PROMPT: &str = "🎵 How many lessons does the student want to buy?";
const LESSONS_INVALID: &str = "❗ Enter a positive number.";
const CANCELLED: &str = "Calculation cancelled. Send /start to begin again.";
const NO_DETAILS: &str = "No details.";

/// Keyboard attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Plain text options the user can tap instead of typing, one row each
    Options(Vec<Vec<String>>),
    /// Hide any options keyboard shown earlier
    RemoveOptions,
    /// Buttons under the message carrying callback tokens
    Actions(Vec<Vec<ActionButton>>),
}

/// Inline button: visible label plus the action it triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub label: String,
    pub action: CallbackAction,
}

/// A message to deliver to the conversant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message and remember its id for cleanup
    Send(OutboundMessage),

    /// Delete every remembered message of the session (best effort)
    PurgeHistory,
}

impl Effect {
    pub fn send(message: OutboundMessage) -> Self {
        Effect::Send(message)
    }

    fn send_text(text: &str) -> Self {
        Effect::Send(OutboundMessage::text(text))
    }

    pub fn city_prompt() -> Self {
        Effect::send(OutboundMessage::text(CITY_PROMPT).with_keyboard(city_keyboard()))
    }

    pub fn city_retry() -> Self {
        Effect::send(OutboundMessage::text(CITY_RETRY).with_keyboard(city_keyboard()))
    }

    pub fn students_prompt() -> Self {
        Effect::send(
            OutboundMessage::text(STUDENTS_PROMPT).with_keyboard(Keyboard::Options(vec![vec![
                "1 student".to_string(),
                "2 students".to_string(),
            ]])),
        )
    }

    pub fn date_prompt() -> Self {
        Effect::send(OutboundMessage::text(DATE_PROMPT).with_keyboard(Keyboard::RemoveOptions))
    }

    pub fn date_invalid() -> Self {
        Effect::send_text(DATE_INVALID)
    }

    pub fn date_out_of_range() -> Self {
        Effect::send_text(DATE_OUT_OF_RANGE)
    }

    pub fn lessons_prompt() -> Self {
        Effect::send_text(LESSONS_PROMPT)
    }

    pub fn lessons_invalid() -> Self {
        Effect::send_text(LESSONS_INVALID)
    }

    pub fn quote_result(quote: &Quote) -> Self {
        let button = |label: &str, action| {
            vec![ActionButton {
                label: label.to_string(),
                action,
            }]
        };
        Effect::send(
            OutboundMessage::text(quote.summary()).with_keyboard(Keyboard::Actions(vec![
                button("📊 Details", CallbackAction::ShowDetails),
                button("🔁 New calculation", CallbackAction::RestartCalc),
            ])),
        )
    }

    pub fn details(details: &str) -> Self {
        Effect::send_text(details)
    }

    pub fn no_details() -> Self {
        Effect::send_text(NO_DETAILS)
    }

    pub fn cancelled() -> Self {
        Effect::send_text(CANCELLED)
    }
}

fn city_keyboard() -> Keyboard {
    Keyboard::Options(vec![City::ALL
        .iter()
        .map(|city| city.name().to_string())
        .collect()])
}
