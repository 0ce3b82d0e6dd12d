//! Calendar utilities
//!
//! Weekday indexing and naming, month-safe date advancement and the
//! Monday..Sunday week window used by the weekly report.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BilltrackError, BilltrackResult};

/// Capitalized weekday names, indexed Monday = 0
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Ordinal of a weekday, Monday = 0 through Sunday = 6
pub fn weekday_index(day: Weekday) -> u32 {
    day.num_days_from_monday()
}

/// Capitalized English name of a weekday ("Monday")
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday_index(day) as usize]
}

/// Parse a weekday name, case-insensitive; three-letter forms are accepted
pub fn parse_weekday(s: &str) -> BilltrackResult<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| BilltrackError::InvalidWeekday(s.to_string()))
}

/// How a monthly step chooses the day-of-month in the destination month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthEndPolicy {
    /// Keep the original day, clamped to the true length of the destination month
    #[default]
    ClampToMonthLength,
    /// Never go past the 28th, whatever the destination month
    #[serde(rename = "clamp_to_28")]
    ClampTo28,
}

impl MonthEndPolicy {
    fn clamp_day(self, year: i32, month: u32, day: u32) -> u32 {
        match self {
            Self::ClampToMonthLength => day.min(days_in_month(year, month)),
            Self::ClampTo28 => day.min(28),
        }
    }
}

impl fmt::Display for MonthEndPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClampToMonthLength => write!(f, "clamp to month length"),
            Self::ClampTo28 => write!(f, "clamp to 28"),
        }
    }
}

/// Gregorian leap year test
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a month (1-12)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Advance `date` by `months` calendar months under the given policy
pub fn add_months(date: NaiveDate, months: u32, policy: MonthEndPolicy) -> BilltrackResult<NaiveDate> {
    let month_index = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(month_index.div_euclid(12)).map_err(|_| {
        BilltrackError::DateOutOfRange(format!("{} plus {} months", date, months))
    })?;
    let month = month_index.rem_euclid(12) as u32 + 1;
    let day = policy.clamp_day(year, month, date.day());

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| BilltrackError::DateOutOfRange(format!("{} plus {} months", date, months)))
}

/// Advance exactly one calendar month, clamping to the destination month's length
pub fn add_calendar_month(date: NaiveDate) -> BilltrackResult<NaiveDate> {
    add_months(date, 1, MonthEndPolicy::ClampToMonthLength)
}

/// Advance `date` by a number of days
pub fn add_days(date: NaiveDate, days: i64) -> BilltrackResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| BilltrackError::DateOutOfRange(format!("{} plus {} days", date, days)))
}

/// An inclusive Monday..Sunday date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Check if a date falls within this window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// The Monday..Sunday window containing `reference`
///
/// Saturates at the ends of the representable calendar.
pub fn week_window(reference: NaiveDate) -> WeekWindow {
    let offset = i64::from(weekday_index(reference.weekday()));
    let start = reference
        .checked_sub_signed(Duration::days(offset))
        .unwrap_or(NaiveDate::MIN);
    let end = start
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX);
    WeekWindow { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(weekday_index(Weekday::Mon), 0);
        assert_eq!(weekday_index(Weekday::Fri), 4);
        assert_eq!(weekday_index(Weekday::Sun), 6);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
        assert_eq!(parse_weekday("friday").unwrap(), Weekday::Fri);
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday(" SUN ").unwrap(), Weekday::Sun);
        assert!(matches!(
            parse_weekday("Funday"),
            Err(BilltrackError::InvalidWeekday(_))
        ));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn test_add_calendar_month() {
        assert_eq!(add_calendar_month(date(2025, 1, 15)).unwrap(), date(2025, 2, 15));
        assert_eq!(add_calendar_month(date(2025, 1, 31)).unwrap(), date(2025, 2, 28));
        assert_eq!(add_calendar_month(date(2024, 1, 31)).unwrap(), date(2024, 2, 29));
        assert_eq!(add_calendar_month(date(2025, 12, 31)).unwrap(), date(2026, 1, 31));
    }

    #[test]
    fn test_add_months_policies_diverge_after_february() {
        let jan31 = date(2025, 1, 31);

        let true_length: Vec<_> = (0..3)
            .map(|n| add_months(jan31, n, MonthEndPolicy::ClampToMonthLength).unwrap())
            .collect();
        assert_eq!(true_length, vec![jan31, date(2025, 2, 28), date(2025, 3, 31)]);

        let clamp28: Vec<_> = (1..3)
            .map(|n| add_months(jan31, n, MonthEndPolicy::ClampTo28).unwrap())
            .collect();
        assert_eq!(clamp28, vec![date(2025, 2, 28), date(2025, 3, 28)]);
    }

    #[test]
    fn test_add_months_out_of_range() {
        assert!(matches!(
            add_months(NaiveDate::MAX, 1, MonthEndPolicy::ClampToMonthLength),
            Err(BilltrackError::DateOutOfRange(_))
        ));
        assert!(add_days(NaiveDate::MAX, 7).is_err());
    }

    #[test]
    fn test_week_window() {
        // Friday 2025-05-09
        let window = week_window(date(2025, 5, 9));
        assert_eq!(window.start, date(2025, 5, 5));
        assert_eq!(window.end, date(2025, 5, 11));
        assert!(window.contains(date(2025, 5, 11)));
        assert!(!window.contains(date(2025, 5, 12)));

        // Monday and Sunday map to their own week
        assert_eq!(week_window(date(2025, 5, 5)), window);
        assert_eq!(week_window(date(2025, 5, 11)), window);
    }

    #[test]
    fn test_week_window_display() {
        let window = week_window(date(2025, 5, 9));
        assert_eq!(window.to_string(), "2025-05-05..2025-05-11");
    }

    #[test]
    fn test_month_end_policy_serialization() {
        let json = serde_json::to_string(&MonthEndPolicy::ClampTo28).unwrap();
        assert_eq!(json, "\"clamp_to_28\"");
        let back: MonthEndPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MonthEndPolicy::ClampTo28);
    }
}
