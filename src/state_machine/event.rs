//! Events that drive a quote session

use std::fmt;
use std::str::FromStr;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `/start` command
    Start,
    /// "New calculation" button
    Restart,
    /// `/cancel` command
    Cancel,
    /// "Details" button
    ShowDetails,
    /// Free text typed by the user, already trimmed
    UserText { text: String },
}

impl Event {
    pub fn user_text(text: impl AsRef<str>) -> Self {
        Event::UserText {
            text: text.as_ref().trim().to_string(),
        }
    }

    /// Whether this event may create a session that does not exist yet
    pub fn opens_session(&self) -> bool {
        matches!(self, Event::Start | Event::Restart)
    }
}

impl From<CallbackAction> for Event {
    fn from(action: CallbackAction) -> Self {
        match action {
            CallbackAction::ShowDetails => Event::ShowDetails,
            CallbackAction::RestartCalc => Event::Restart,
        }
    }
}

/// Actions attached to inline buttons, carried as opaque callback tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackAction {
    ShowDetails,
    RestartCalc,
}

impl CallbackAction {
    pub fn token(self) -> &'static str {
        match self {
            CallbackAction::ShowDetails => "show_details",
            CallbackAction::RestartCalc => "restart_calc",
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Callback token that no button of ours produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCallback(pub String);

impl FromStr for CallbackAction {
    type Err = UnknownCallback;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show_details" => Ok(CallbackAction::ShowDetails),
            "restart_calc" => Ok(CallbackAction::RestartCalc),
            other => Err(UnknownCallback(other.to_string())),
        }
    }
}
