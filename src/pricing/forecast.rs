//! Full-month forecast and quote computation

use super::calendar::{FirstLesson, MonthRatio};
use super::table::{City, PriceTable, StudentCount, Tier};
use std::fmt::Write as _;

/// Round `numerator / denominator` to the nearest integer, exact halves
/// going up (away from zero for the non-negative values used here).
///
/// `denominator` must be non-zero.
pub fn round_half_away_from_zero(numerator: u64, denominator: u64) -> u64 {
    debug_assert!(denominator > 0, "rounding by a zero denominator");
    (2 * numerator + denominator) / (2 * denominator)
}

/// Project lessons bought for the rest of the month onto a full month.
///
/// `lessons / ratio` equals `lessons * total / remaining`; the result never
/// drops below one lesson.
pub fn forecast_lessons(lessons: u32, ratio: MonthRatio) -> u64 {
    let numerator = u64::from(lessons) * u64::from(ratio.total());
    round_half_away_from_zero(numerator, u64::from(ratio.remaining())).max(1)
}

/// A computed price quote together with the facts that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub city: City,
    pub students: StudentCount,
    pub first_lesson: FirstLesson,
    pub lessons: u32,
    pub forecast: u64,
    pub tier: Tier,
    pub unit_price: u32,
    pub total: u64,
}

impl Quote {
    /// Short result shown right after the calculation
    pub fn summary(&self) -> String {
        format!(
            "🎵 Lessons: {}\n💵 Price per lesson: {} €\n💰 Total price: {} €",
            self.lessons, self.unit_price, self.total
        )
    }

    /// Breakdown of how the price was derived
    pub fn details(&self) -> String {
        let lesson = &self.first_lesson;
        let mut out = String::new();
        let _ = writeln!(out, "📍 City: {}", self.city);
        let _ = writeln!(out, "👥 Students: {}", self.students);
        let _ = writeln!(out, "📅 First lesson: {}", lesson.date.format("%d.%m.%Y"));
        let _ = writeln!(
            out,
            "📆 Remaining days: {} of {} ({:.0}%)",
            lesson.days_remaining,
            lesson.days_in_month,
            lesson.ratio().percent()
        );
        let _ = write!(
            out,
            "🎯 Forecast: {} lessons → tier {}",
            self.forecast, self.tier
        );
        out
    }
}

impl PriceTable {
    /// Price `lessons` lessons starting at `first_lesson`.
    ///
    /// The tier comes from the full-month forecast, the total from the
    /// lessons actually bought.
    pub fn quote(
        &self,
        city: City,
        students: StudentCount,
        first_lesson: FirstLesson,
        lessons: u32,
    ) -> Quote {
        let forecast = forecast_lessons(lessons, first_lesson.ratio());
        let tier = Tier::for_forecast(forecast);
        let unit_price = self.unit_price(city, students, tier);
        Quote {
            city,
            students,
            first_lesson,
            lessons,
            forecast,
            tier,
            unit_price,
            total: u64::from(lessons) * u64::from(unit_price),
        }
    }
}
