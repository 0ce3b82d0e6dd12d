//! Pay series model
//!
//! A pay series is an incoming payment (a paycheck) recurring on a fixed
//! cadence with no end. Every stepped date counts, whatever its weekday.

use chrono::{NaiveDate, Weekday};
use std::fmt;

use super::calendar::{add_days, week_window, weekday_name, MonthEndPolicy};
use super::frequency::Frequency;
use super::money::Money;
use super::schedule::{Schedule, SeriesValidationError};

/// How far past the reference date `next_pay_date` looks
pub const NEXT_PAY_LOOKAHEAD_DAYS: i64 = 62;

/// A recurring paycheck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaySeries {
    pub name: String,
    pub amount: Money,
    pub frequency: Frequency,
    /// Informational only; pay dates are not filtered by weekday
    pub anchor_weekday: Weekday,
    pub start_date: NaiveDate,
    pub month_end_policy: MonthEndPolicy,
}

impl PaySeries {
    /// Create a new pay series
    pub fn new(
        name: impl Into<String>,
        amount: Money,
        frequency: Frequency,
        anchor_weekday: Weekday,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            frequency,
            anchor_weekday,
            start_date,
            month_end_policy: MonthEndPolicy::default(),
        }
    }

    /// Set how monthly steps clamp the day of month
    pub fn with_month_end_policy(mut self, policy: MonthEndPolicy) -> Self {
        self.month_end_policy = policy;
        self
    }

    /// Validate the pay series
    pub fn validate(&self) -> Result<(), SeriesValidationError> {
        if self.name.trim().is_empty() {
            return Err(SeriesValidationError::EmptyName);
        }
        if !self.amount.is_positive() {
            return Err(SeriesValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    fn schedule(&self) -> Schedule {
        Schedule {
            frequency: self.frequency,
            anchor_weekday: self.anchor_weekday,
            start_date: self.start_date,
            end_date: None,
            weekday_filter: false,
            month_end_policy: self.month_end_policy,
        }
    }

    /// Pay dates inside `[start, end]` in increasing order
    ///
    /// A stepping error ends the list at the last good date.
    pub fn occurrences_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let occurrences = match self.schedule().occurrences(start, end) {
            Ok(occurrences) => occurrences,
            Err(e) => {
                tracing::debug!(series = %self.name, error = %e, "pay dates unavailable");
                return Vec::new();
            }
        };

        let mut dates = Vec::new();
        for date in occurrences {
            match date {
                Ok(date) => dates.push(date),
                Err(e) => {
                    tracing::debug!(series = %self.name, error = %e, "pay dates truncated");
                    break;
                }
            }
        }
        dates
    }

    /// The first pay date in the Monday..Sunday week containing `reference`
    pub fn pay_date_in_week(&self, reference: NaiveDate) -> Option<NaiveDate> {
        let window = week_window(reference);
        self.occurrences_between(window.start, window.end)
            .into_iter()
            .next()
    }

    /// The first pay date on or after `from`, looking a couple of months ahead
    pub fn next_pay_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        let horizon = add_days(from, NEXT_PAY_LOOKAHEAD_DAYS).unwrap_or(NaiveDate::MAX);
        self.occurrences_between(from, horizon).into_iter().next()
    }
}

impl fmt::Display for PaySeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {} ({})",
            self.name,
            self.amount,
            self.frequency,
            weekday_name(self.anchor_weekday)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn job(frequency: Frequency) -> PaySeries {
        PaySeries::new(
            "Job",
            Money::from_dollars_f64(1000.0),
            frequency,
            Weekday::Fri,
            date(2025, 1, 10),
        )
    }

    #[test]
    fn test_biweekly_dates() {
        let dates = job(Frequency::Biweekly).occurrences_between(date(2025, 4, 20), date(2025, 5, 31));
        assert_eq!(dates, vec![date(2025, 5, 2), date(2025, 5, 16), date(2025, 5, 30)]);
    }

    #[test]
    fn test_pay_date_in_week() {
        // Week of 2025-05-05..2025-05-11 falls between two biweekly paydays
        assert_eq!(job(Frequency::Biweekly).pay_date_in_week(date(2025, 5, 9)), None);
        assert_eq!(
            job(Frequency::Biweekly).pay_date_in_week(date(2025, 5, 14)),
            Some(date(2025, 5, 16))
        );
        assert_eq!(
            job(Frequency::Weekly).pay_date_in_week(date(2025, 5, 9)),
            Some(date(2025, 5, 9))
        );
    }

    #[test]
    fn test_no_weekday_filter() {
        // Monthly from Friday 2025-01-10 lands on every weekday eventually
        let pay = job(Frequency::Monthly);
        let dates = pay.occurrences_between(date(2025, 1, 1), date(2025, 6, 30));
        assert_eq!(dates.len(), 6);
        assert!(dates.iter().any(|d| d.weekday() != Weekday::Fri));
        assert!(dates.iter().all(|d| d.day() == 10));
    }

    #[test]
    fn test_reversed_window_is_empty() {
        let dates = job(Frequency::Weekly).occurrences_between(date(2025, 6, 1), date(2025, 5, 1));
        assert!(dates.is_empty());
    }

    #[test]
    fn test_next_pay_date() {
        let pay = job(Frequency::Biweekly);
        assert_eq!(pay.next_pay_date(date(2025, 5, 3)), Some(date(2025, 5, 16)));
        assert_eq!(pay.next_pay_date(date(2025, 5, 16)), Some(date(2025, 5, 16)));
        // Nothing within the lookahead before the series starts
        assert_eq!(pay.next_pay_date(date(2024, 1, 1)), None);
        assert_eq!(pay.next_pay_date(date(2024, 12, 1)), Some(date(2025, 1, 10)));
    }

    #[test]
    fn test_series_near_last_date() {
        let start = NaiveDate::MAX - chrono::Duration::days(3);
        let pay = PaySeries::new("Late", Money::from_cents(100), Frequency::Weekly, Weekday::Mon, start);
        assert_eq!(pay.occurrences_between(start, NaiveDate::MAX), vec![start]);
    }

    #[test]
    fn test_validation() {
        let mut pay = job(Frequency::Weekly);
        assert!(pay.validate().is_ok());
        pay.amount = Money::from_cents(-5);
        assert_eq!(pay.validate(), Err(SeriesValidationError::NonPositiveAmount));
    }
}
