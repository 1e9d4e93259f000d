//! First-lesson date parsing and month arithmetic

use chrono::{Datelike, NaiveDate};

/// A date grammar: chrono format, field separator, and which of the three
/// fields holds the year
struct DateGrammar {
    format: &'static str,
    separator: char,
    year_field: usize,
}

/// Accepted date grammars, tried in order
const DATE_GRAMMARS: [DateGrammar; 2] = [
    DateGrammar {
        format: "%d.%m.%Y",
        separator: '.',
        year_field: 2,
    },
    DateGrammar {
        format: "%Y-%m-%d",
        separator: '-',
        year_field: 0,
    },
];

impl DateGrammar {
    /// chrono tolerates short years, signs and padding; the grammar does not.
    /// Years are exactly 4 digits, day and month 1 or 2.
    fn matches_shape(&self, text: &str) -> bool {
        let fields: Vec<&str> = text.split(self.separator).collect();
        fields.len() == 3
            && fields.iter().enumerate().all(|(i, field)| {
                let width = if i == self.year_field { 4..=4 } else { 1..=2 };
                width.contains(&field.len()) && field.bytes().all(|b| b.is_ascii_digit())
            })
    }

    fn parse(&self, text: &str) -> Option<NaiveDate> {
        if !self.matches_shape(text) {
            return None;
        }
        NaiveDate::parse_from_str(text, self.format).ok()
    }
}

/// Parse a first-lesson date. The first grammar that matches wins.
pub fn parse_first_lesson_date(text: &str) -> Option<NaiveDate> {
    DATE_GRAMMARS.iter().find_map(|grammar| grammar.parse(text))
}

/// Calendar length of a month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Fraction of a month still ahead, first-lesson day included.
///
/// Kept as an exact rational so forecasts never suffer float drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRatio {
    remaining: u32,
    total: u32,
}

impl MonthRatio {
    /// `None` unless `1 <= remaining <= total`
    pub fn new(remaining: u32, total: u32) -> Option<Self> {
        (1..=total).contains(&remaining).then_some(Self { remaining, total })
    }

    pub fn remaining(self) -> u32 {
        self.remaining
    }

    pub fn total(self) -> u32 {
        self.total
    }

    /// Ratio as a percentage, used for display only
    pub fn percent(self) -> f64 {
        f64::from(self.remaining) * 100.0 / f64::from(self.total)
    }
}

/// The first lesson date with its derived month figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstLesson {
    pub date: NaiveDate,
    pub days_in_month: u32,
    pub days_remaining: u32,
}

impl FirstLesson {
    /// Derive month figures. Returns `None` if the remaining-day count falls
    /// outside `1..=days_in_month`, which a real calendar date never does.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        let days_in_month = days_in_month(date.year(), date.month())?;
        let days_remaining = (days_in_month + 1).checked_sub(date.day())?;
        MonthRatio::new(days_remaining, days_in_month)?;
        Some(Self {
            date,
            days_in_month,
            days_remaining,
        })
    }

    pub fn ratio(&self) -> MonthRatio {
        MonthRatio {
            remaining: self.days_remaining,
            total: self.days_in_month,
        }
    }
}
