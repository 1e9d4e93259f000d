//! Pricing engine
//!
//! Pure functions from the collected answers to a tiered price quote.
//! Nothing here holds state; the price grid is a read-only constant.

mod calendar;
mod forecast;
mod table;

pub use calendar::{parse_first_lesson_date, FirstLesson};
pub use forecast::Quote;
pub use table::{City, PriceTable, StudentCount};
#[cfg(test)]
pub use table::Tier;
