//! Core data models for billtrack
//!
//! Calendar arithmetic, the cadence engine, and the bill and pay series
//! built on top of it.

pub mod bill;
pub mod calendar;
pub mod frequency;
pub mod money;
pub mod pay;
pub mod schedule;

pub use bill::BillSeries;
pub use calendar::{
    add_calendar_month, add_days, add_months, days_in_month, is_leap_year, parse_weekday,
    week_window, weekday_index, weekday_name, MonthEndPolicy, WeekWindow,
};
pub use frequency::Frequency;
pub use money::{Money, MoneyParseError};
pub use pay::PaySeries;
pub use schedule::{Occurrences, Schedule, SeriesValidationError};
