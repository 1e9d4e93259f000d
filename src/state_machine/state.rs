//! Session state types

use crate::pricing::{City, FirstLesson, PriceTable, Quote, StudentCount};
use std::sync::Arc;

// ============================================================================
// Session State
// ============================================================================

/// Where a quote session stands. Each step carries exactly the answers
/// collected before it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for one of the supported city names
    #[default]
    AwaitingCity,

    /// City chosen, waiting for the number of students
    AwaitingStudentCount { city: City },

    /// Waiting for the first lesson date
    AwaitingDate { city: City, students: StudentCount },

    /// Waiting for the number of lessons to buy this month
    AwaitingLessonCount {
        city: City,
        students: StudentCount,
        first_lesson: FirstLesson,
    },

    /// Quote produced; details kept for the "Details" button
    Done { quote: Quote, details: String },

    /// User cancelled before the quote was produced
    Cancelled,
}

impl SessionState {
    /// Terminal states accept only restarts (and detail requests in `Done`)
    #[cfg(test)]
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Done { .. } | SessionState::Cancelled)
    }

    /// Stable step name for logs
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::AwaitingCity => "awaiting_city",
            SessionState::AwaitingStudentCount { .. } => "awaiting_student_count",
            SessionState::AwaitingDate { .. } => "awaiting_date",
            SessionState::AwaitingLessonCount { .. } => "awaiting_lesson_count",
            SessionState::Done { .. } => "done",
            SessionState::Cancelled => "cancelled",
        }
    }
}

/// Context for a session (immutable configuration)
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub prices: Arc<PriceTable>,
}

impl SessionContext {
    pub fn new(prices: Arc<PriceTable>) -> Self {
        Self { prices }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(Arc::new(PriceTable::STANDARD))
    }
}
