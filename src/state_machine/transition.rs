//! Pure state transition function

use super::{Effect, Event, SessionContext, SessionState};
use crate::pricing::{parse_first_lesson_date, City, FirstLesson, StudentCount};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events a state does not act on
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Session is finished; start a new calculation")]
    SessionFinished,
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; effects
/// describe the I/O for the runtime to perform.
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Session (re)start
        // ============================================================

        // Any state + Start/Restart -> AwaitingCity with a clean slate
        (_, Event::Start | Event::Restart) => Ok(TransitionResult::new(SessionState::AwaitingCity)
            .with_effect(Effect::PurgeHistory)
            .with_effect(Effect::city_prompt())),

        // ============================================================
        // Collecting answers
        // ============================================================
        (SessionState::AwaitingCity, Event::UserText { text }) => match text.parse::<City>() {
            Ok(city) => Ok(
                TransitionResult::new(SessionState::AwaitingStudentCount { city })
                    .with_effect(Effect::students_prompt()),
            ),
            Err(_) => Ok(TransitionResult::new(state.clone()).with_effect(Effect::city_retry())),
        },

        (SessionState::AwaitingStudentCount { city }, Event::UserText { text }) => {
            let students = StudentCount::from_answer(&text);
            Ok(TransitionResult::new(SessionState::AwaitingDate {
                city: *city,
                students,
            })
            .with_effect(Effect::date_prompt()))
        }

        (SessionState::AwaitingDate { city, students }, Event::UserText { text }) => {
            let Some(date) = parse_first_lesson_date(&text) else {
                return Ok(TransitionResult::new(state.clone()).with_effect(Effect::date_invalid()));
            };
            let Some(first_lesson) = FirstLesson::from_date(date) else {
                return Ok(
                    TransitionResult::new(state.clone()).with_effect(Effect::date_out_of_range())
                );
            };
            Ok(TransitionResult::new(SessionState::AwaitingLessonCount {
                city: *city,
                students: *students,
                first_lesson,
            })
            .with_effect(Effect::lessons_prompt()))
        }

        (
            SessionState::AwaitingLessonCount {
                city,
                students,
                first_lesson,
            },
            Event::UserText { text },
        ) => {
            let Some(lessons) = parse_lesson_count(&text) else {
                return Ok(
                    TransitionResult::new(state.clone()).with_effect(Effect::lessons_invalid())
                );
            };
            let quote = context
                .prices
                .quote(*city, *students, *first_lesson, lessons);
            let details = quote.details();
            let effect = Effect::quote_result(&quote);
            Ok(TransitionResult::new(SessionState::Done { quote, details }).with_effect(effect))
        }

        // ============================================================
        // Details
        // ============================================================

        // Done + ShowDetails -> Done (unchanged), resend stored details
        (SessionState::Done { details, .. }, Event::ShowDetails) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::details(details)))
        }

        (_, Event::ShowDetails) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::no_details()))
        }

        // ============================================================
        // Cancellation
        // ============================================================
        (
            SessionState::AwaitingCity
            | SessionState::AwaitingStudentCount { .. }
            | SessionState::AwaitingDate { .. }
            | SessionState::AwaitingLessonCount { .. },
            Event::Cancel,
        ) => Ok(TransitionResult::new(SessionState::Cancelled).with_effect(Effect::cancelled())),

        // ============================================================
        // Finished sessions
        // ============================================================

        // Only Start, Restart and ShowDetails act once a session is over
        (
            SessionState::Done { .. } | SessionState::Cancelled,
            Event::UserText { .. } | Event::Cancel,
        ) => Err(TransitionError::SessionFinished),
    }
}

/// Lesson count: ASCII digits only, strictly positive
fn parse_lesson_count(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u32>().ok().filter(|n| *n > 0)
}
