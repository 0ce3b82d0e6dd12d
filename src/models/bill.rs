//! Bill series model
//!
//! A bill is an outgoing payment that recurs on a fixed cadence from a start
//! date, optionally ending on a termination date. Only stepped dates that
//! land on the bill's weekday count as occurrences.

use chrono::{NaiveDate, Weekday};
use std::fmt;

use super::calendar::{add_days, weekday_name, MonthEndPolicy};
use super::frequency::Frequency;
use super::money::Money;
use super::schedule::{Schedule, SeriesValidationError};
use crate::error::BilltrackResult;

/// How far past the reference date `next_due` looks before giving up
pub const NEXT_DUE_LOOKAHEAD_DAYS: i64 = 731;

/// A recurring bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillSeries {
    pub name: String,
    pub amount: Money,
    pub frequency: Frequency,
    pub anchor_weekday: Weekday,
    pub start_date: NaiveDate,
    /// Last date a payment can fall on; `None` for an open-ended bill
    pub end_date: Option<NaiveDate>,
    pub month_end_policy: MonthEndPolicy,
}

impl BillSeries {
    /// Create an open-ended bill
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
            end_date: None,
            month_end_policy: MonthEndPolicy::default(),
        }
    }

    /// Set the termination date
    pub fn with_end_date(mut self, end_date: Option<NaiveDate>) -> Self {
        self.end_date = end_date;
        self
    }

    /// Set how monthly steps clamp the day of month
    pub fn with_month_end_policy(mut self, policy: MonthEndPolicy) -> Self {
        self.month_end_policy = policy;
        self
    }

    /// Validate the bill
    pub fn validate(&self) -> Result<(), SeriesValidationError> {
        if self.name.trim().is_empty() {
            return Err(SeriesValidationError::EmptyName);
        }
        if !self.amount.is_positive() {
            return Err(SeriesValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    /// Whether the bill has a termination date
    pub fn is_bounded(&self) -> bool {
        self.end_date.is_some()
    }

    fn schedule(&self) -> Schedule {
        Schedule {
            frequency: self.frequency,
            anchor_weekday: self.anchor_weekday,
            start_date: self.start_date,
            end_date: self.end_date,
            weekday_filter: true,
            month_end_policy: self.month_end_policy,
        }
    }

    /// Payment dates inside `[start, end]` in increasing order
    ///
    /// Returns an empty list when `end < start`. Fails if stepping leaves the
    /// representable calendar before the window is covered.
    pub fn occurrences_between(&self, start: NaiveDate, end: NaiveDate) -> BilltrackResult<Vec<NaiveDate>> {
        self.schedule().occurrences(start, end)?.collect()
    }

    /// Number of payments from the start date through `as_of`, inclusive
    pub fn payments_made_by(&self, as_of: NaiveDate) -> BilltrackResult<u32> {
        let mut count = 0u32;
        for date in self.schedule().occurrences(self.start_date, as_of)? {
            date?;
            count = count.saturating_add(1);
        }
        Ok(count)
    }

    /// Total number of payments, or `None` for an open-ended bill
    pub fn total_payments(&self) -> BilltrackResult<Option<u32>> {
        self.end_date
            .map(|end| self.payments_made_by(end))
            .transpose()
    }

    /// Payments still to come after `as_of`, or `None` for an open-ended bill
    pub fn remaining_payments(&self, as_of: NaiveDate) -> BilltrackResult<Option<u32>> {
        let Some(total) = self.total_payments()? else {
            return Ok(None);
        };
        let made = self.payments_made_by(as_of)?;
        Ok(Some(total.saturating_sub(made)))
    }

    /// Progress text such as "Payment 3 of 12" or "Payment 3 of ?"
    pub fn payment_status(&self, as_of: NaiveDate) -> BilltrackResult<String> {
        let made = self.payments_made_by(as_of)?;
        Ok(match self.total_payments()? {
            Some(total) => format!("Payment {} of {}", made, total),
            None => format!("Payment {} of ?", made),
        })
    }

    /// First payment date on or after `as_of`
    pub fn next_due(&self, as_of: NaiveDate) -> BilltrackResult<Option<NaiveDate>> {
        let horizon = add_days(as_of, NEXT_DUE_LOOKAHEAD_DAYS).unwrap_or(NaiveDate::MAX);
        self.schedule().occurrences(as_of, horizon)?.next().transpose()
    }
}

impl fmt::Display for BillSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {} on {}",
            self.name,
            self.amount,
            self.frequency,
            weekday_name(self.anchor_weekday)
        )
    }
}
