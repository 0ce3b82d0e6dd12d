//! Cadence-stepping engine shared by bill and pay series
//!
//! A [`Schedule`] describes the stepped dates of a series: the n-th step is
//! `start_date + n * 7` days (weekly), `+ n * 14` days (biweekly) or
//! `+ n` calendar months (monthly). Monthly steps are always taken from the
//! start date, not chained from the previous step, so a series anchored on
//! the 31st comes back to the 31st after a short month.
//!
//! Bills and pay series configure the engine differently: bills carry an
//! optional termination date and keep only steps that fall on the anchor
//! weekday, pay series keep every step.

use chrono::{Datelike, NaiveDate, Weekday};

use super::calendar::{add_days, add_months, MonthEndPolicy};
use super::frequency::Frequency;
use crate::error::{BilltrackError, BilltrackResult};

/// Validation errors shared by bill and pay series
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesValidationError {
    EmptyName,
    NonPositiveAmount,
}

impl std::fmt::Display for SeriesValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Series name cannot be empty"),
            Self::NonPositiveAmount => write!(f, "Series amount must be positive"),
        }
    }
}

impl std::error::Error for SeriesValidationError {}

/// Stepping configuration for one series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub frequency: Frequency,
    pub anchor_weekday: Weekday,
    pub start_date: NaiveDate,
    /// Steps after this date do not count
    pub end_date: Option<NaiveDate>,
    /// Keep only steps that land on `anchor_weekday`
    pub weekday_filter: bool,
    pub month_end_policy: MonthEndPolicy,
}

impl Schedule {
    /// The n-th stepped date (step 0 is the start date itself)
    pub fn nth(&self, n: u32) -> BilltrackResult<NaiveDate> {
        if n == 0 {
            return Ok(self.start_date);
        }
        match self.frequency.step_days() {
            Some(step) => add_days(self.start_date, step * i64::from(n)),
            None => add_months(self.start_date, n, self.month_end_policy),
        }
    }

    /// Index of the first stepped date on or after `date`
    fn first_index_on_or_after(&self, date: NaiveDate) -> BilltrackResult<u32> {
        if date <= self.start_date {
            return Ok(0);
        }

        let estimate = match self.frequency.step_days() {
            Some(step) => {
                let days = (date - self.start_date).num_days();
                (days + step - 1) / step
            }
            None => {
                let months = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
                months(date) - months(self.start_date)
            }
        };
        let mut index = u32::try_from(estimate).map_err(|_| {
            BilltrackError::DateOutOfRange(format!("{} steps from {}", estimate, self.start_date))
        })?;

        // A clamped monthly step can land earlier in the month than `date`
        while self.nth(index)? < date {
            index = index.checked_add(1).ok_or_else(|| {
                BilltrackError::DateOutOfRange(format!("stepping past {}", date))
            })?;
        }
        Ok(index)
    }

    /// Stepped dates inside `[start, end]`, honoring the termination date and
    /// the weekday filter
    ///
    /// A reversed window yields nothing. A step that would pass chrono's last
    /// representable date ends the walk. The iterator ends after the first
    /// error it yields.
    pub fn occurrences(&self, start: NaiveDate, end: NaiveDate) -> BilltrackResult<Occurrences> {
        if end < start {
            return Ok(Occurrences::exhausted(*self));
        }
        let index = match self.first_index_on_or_after(start) {
            Ok(index) => index,
            Err(BilltrackError::DateOutOfRange(_)) => return Ok(Occurrences::exhausted(*self)),
            Err(e) => return Err(e),
        };
        Ok(Occurrences {
            schedule: *self,
            index,
            end,
            done: false,
        })
    }

    fn accepts(&self, date: NaiveDate) -> bool {
        !self.weekday_filter || date.weekday() == self.anchor_weekday
    }

    fn past_end(&self, date: NaiveDate, window_end: NaiveDate) -> bool {
        date > window_end || self.end_date.is_some_and(|end| date > end)
    }
}

/// Lazy, finite walk over the stepped dates of a [`Schedule`]
#[derive(Debug, Clone)]
pub struct Occurrences {
    schedule: Schedule,
    index: u32,
    end: NaiveDate,
    done: bool,
}

impl Occurrences {
    fn exhausted(schedule: Schedule) -> Self {
        Self {
            schedule,
            index: 0,
            end: schedule.start_date,
            done: true,
        }
    }
}

impl Iterator for Occurrences {
    type Item = BilltrackResult<NaiveDate>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let date = match self.schedule.nth(self.index) {
                Ok(date) => date,
                // The step lies beyond the last representable date, so beyond any window
                Err(BilltrackError::DateOutOfRange(_)) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            if self.schedule.past_end(date, self.end) {
                self.done = true;
                return None;
            }

            match self.index.checked_add(1) {
                Some(next) => self.index = next,
                None => self.done = true,
            }

            if self.schedule.accepts(date) {
                return Some(Ok(date));
            }
        }
        None
    }
}
