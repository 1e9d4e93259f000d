//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::pricing::{City, FirstLesson, PriceTable, StudentCount, Tier};
use chrono::NaiveDate;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> SessionContext {
    SessionContext::default()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_city() -> impl Strategy<Value = City> {
    prop_oneof![Just(City::Vilnius), Just(City::Kaunas), Just(City::Klaipeda)]
}

fn arb_students() -> impl Strategy<Value = StudentCount> {
    prop_oneof![Just(StudentCount::One), Just(StudentCount::Two)]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=365).prop_map(|(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal).expect("ordinal 1..=365 is valid in every year")
    })
}

fn arb_first_lesson() -> impl Strategy<Value = FirstLesson> {
    arb_date().prop_map(|date| FirstLesson::from_date(date).expect("calendar dates are in range"))
}

fn arb_collecting_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::AwaitingCity),
        arb_city().prop_map(|city| SessionState::AwaitingStudentCount { city }),
        (arb_city(), arb_students())
            .prop_map(|(city, students)| SessionState::AwaitingDate { city, students }),
        (arb_city(), arb_students(), arb_first_lesson()).prop_map(
            |(city, students, first_lesson)| SessionState::AwaitingLessonCount {
                city,
                students,
                first_lesson,
            }
        ),
    ]
}

fn arb_done_state() -> impl Strategy<Value = SessionState> {
    (arb_city(), arb_students(), arb_first_lesson(), 1u32..40).prop_map(
        |(city, students, first_lesson, lessons)| {
            let quote = PriceTable::STANDARD.quote(city, students, first_lesson, lessons);
            let details = quote.details();
            SessionState::Done { quote, details }
        },
    )
}

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        arb_collecting_state(),
        arb_done_state(),
        Just(SessionState::Cancelled),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Vilnius".to_string()),
        Just("Kaunas".to_string()),
        Just("Klaipėda".to_string()),
        Just("2 students".to_string()),
        Just("05.03.2025".to_string()),
        Just("2025-03-31".to_string()),
        "[0-9]{1,3}",
        "[a-zA-Z0-9 ./-]{0,12}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Start),
        Just(Event::Restart),
        Just(Event::Cancel),
        Just(Event::ShowDetails),
        arb_text().prop_map(Event::user_text),
    ]
}

/// Text that is never a valid lesson count
fn arb_non_lesson_count() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z .,+-]{1,10}",
        "0{1,4}",
        "-[0-9]{1,4}",
        "[0-9]{1,3}\\.[0-9]{1,2}",
        Just(String::new()),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_reset_always_returns_to_city(state in arb_state(), restart in any::<bool>()) {
        let event = if restart { Event::Restart } else { Event::Start };
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state, SessionState::AwaitingCity);
        prop_assert_eq!(result.effects, vec![Effect::PurgeHistory, Effect::city_prompt()]);
    }

    #[test]
    fn prop_show_details_never_mutates(state in arb_state()) {
        let first = transition(&state, &test_context(), Event::ShowDetails).unwrap();
        let second = transition(&first.new_state, &test_context(), Event::ShowDetails).unwrap();
        prop_assert_eq!(&first.new_state, &state);
        prop_assert_eq!(&second.new_state, &state);
        prop_assert_eq!(first.effects, second.effects);
    }

    #[test]
    fn prop_invalid_lesson_count_never_advances(
        city in arb_city(),
        students in arb_students(),
        first_lesson in arb_first_lesson(),
        input in arb_non_lesson_count(),
    ) {
        let state = SessionState::AwaitingLessonCount { city, students, first_lesson };
        let result = transition(&state, &test_context(), Event::user_text(&input)).unwrap();
        prop_assert_eq!(result.new_state, state);
        prop_assert_eq!(result.effects, vec![Effect::lessons_invalid()]);
    }

    #[test]
    fn prop_cancel_only_from_collecting(state in arb_state()) {
        let result = transition(&state, &test_context(), Event::Cancel);
        if state.is_terminal() {
            prop_assert!(matches!(result, Err(TransitionError::SessionFinished)));
        } else {
            prop_assert_eq!(result.unwrap().new_state, SessionState::Cancelled);
        }
    }

    #[test]
    fn prop_complete_flow_prices_consistently(
        city in arb_city(),
        two_students in any::<bool>(),
        date in arb_date(),
        lessons in 1u32..60,
    ) {
        let ctx = test_context();
        let students_answer = if two_students { "2 students" } else { "1 student" };
        let date_answer = date.format("%d.%m.%Y").to_string();
        let lessons_answer = lessons.to_string();

        let mut state = SessionState::default();
        for event in [
            Event::Start,
            Event::user_text(city.name()),
            Event::user_text(students_answer),
            Event::user_text(&date_answer),
            Event::user_text(&lessons_answer),
        ] {
            state = transition(&state, &ctx, event).unwrap().new_state;
        }

        let SessionState::Done { quote, details } = state else {
            return Err(TestCaseError::fail("flow did not finish"));
        };
        prop_assert_eq!(quote.city, city);
        prop_assert_eq!(quote.students.get(), if two_students { 2 } else { 1 });
        prop_assert_eq!(quote.first_lesson.date, date);
        prop_assert_eq!(quote.tier, Tier::for_forecast(quote.forecast));
        prop_assert_eq!(
            quote.unit_price,
            PriceTable::STANDARD.unit_price(quote.city, quote.students, quote.tier)
        );
        prop_assert_eq!(quote.total, u64::from(lessons) * u64::from(quote.unit_price));
        prop_assert_eq!(details, quote.details());
    }

    #[test]
    fn prop_any_event_sequence_stays_well_formed(
        events in proptest::collection::vec(arb_event(), 0..30),
    ) {
        let ctx = test_context();
        let mut state = SessionState::default();
        for event in events {
            match transition(&state, &ctx, event) {
                Ok(result) => state = result.new_state,
                Err(TransitionError::SessionFinished) => prop_assert!(state.is_terminal()),
            }
            if let SessionState::AwaitingLessonCount { first_lesson, .. } = &state {
                prop_assert!(first_lesson.days_remaining >= 1);
                prop_assert!(first_lesson.days_remaining <= first_lesson.days_in_month);
            }
        }
    }
}
