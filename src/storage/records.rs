//! Flat persistence records
//!
//! Series are stored as plain JSON objects with string cadences, capitalized
//! weekday names, dollar amounts and ISO dates. Converting a record back into
//! a series is where bad stored data is caught.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BilltrackError, BilltrackResult};
use crate::models::{parse_weekday, weekday_name, BillSeries, Frequency, Money, MonthEndPolicy, PaySeries};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored shape of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRecord {
    pub name: String,
    pub amount: f64,
    pub frequency: String,
    pub day_of_week: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Stored shape of a pay series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRecord {
    pub name: String,
    pub amount: f64,
    pub frequency: String,
    pub day_of_week: String,
    pub start_date: Option<String>,
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(name: &str, field: &str, value: &str) -> BilltrackResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        BilltrackError::MalformedRecord(format!("{}: {} '{}' is not a date ({})", name, field, value, e))
    })
}

fn required_start(name: &str, start_date: Option<&str>) -> BilltrackResult<NaiveDate> {
    let value = start_date
        .ok_or_else(|| BilltrackError::MalformedRecord(format!("{}: missing start_date", name)))?;
    parse_date(name, "start_date", value)
}

/// Stored amounts must be a whole number of cents
fn record_amount(name: &str, amount: f64) -> BilltrackResult<Money> {
    let cents = amount * 100.0;
    if !cents.is_finite() || cents.abs() >= i64::MAX as f64 || (cents - cents.round()).abs() > 1e-6 {
        return Err(BilltrackError::MalformedRecord(format!(
            "{}: amount {} is not a whole number of cents",
            name, amount
        )));
    }
    Ok(Money::from_dollars_f64(amount))
}

fn malformed(name: &str) -> impl Fn(BilltrackError) -> BilltrackError + '_ {
    move |e| BilltrackError::MalformedRecord(format!("{}: {}", name, e))
}

impl From<&BillSeries> for BillRecord {
    fn from(bill: &BillSeries) -> Self {
        Self {
            name: bill.name.clone(),
            amount: bill.amount.to_dollars_f64(),
            frequency: bill.frequency.as_str().to_string(),
            day_of_week: weekday_name(bill.anchor_weekday).to_string(),
            start_date: Some(format_date(bill.start_date)),
            end_date: bill.end_date.map(format_date),
        }
    }
}

impl BillRecord {
    /// Turn the record into a bill using the given month-end policy
    pub fn into_series(self, policy: MonthEndPolicy) -> BilltrackResult<BillSeries> {
        let frequency: Frequency = self.frequency.parse().map_err(malformed(&self.name))?;
        let weekday = parse_weekday(&self.day_of_week).map_err(malformed(&self.name))?;
        let start_date = required_start(&self.name, self.start_date.as_deref())?;
        let end_date = self
            .end_date
            .as_deref()
            .map(|value| parse_date(&self.name, "end_date", value))
            .transpose()?;

        let amount = record_amount(&self.name, self.amount)?;

        Ok(BillSeries::new(
            self.name,
            amount,
            frequency,
            weekday,
            start_date,
        )
        .with_end_date(end_date)
        .with_month_end_policy(policy))
    }
}

impl TryFrom<BillRecord> for BillSeries {
    type Error = BilltrackError;

    fn try_from(record: BillRecord) -> Result<Self, Self::Error> {
        record.into_series(MonthEndPolicy::default())
    }
}

impl From<&PaySeries> for PayRecord {
    fn from(pay: &PaySeries) -> Self {
        Self {
            name: pay.name.clone(),
            amount: pay.amount.to_dollars_f64(),
            frequency: pay.frequency.as_str().to_string(),
            day_of_week: weekday_name(pay.anchor_weekday).to_string(),
            start_date: Some(format_date(pay.start_date)),
        }
    }
}

impl PayRecord {
    /// Turn the record into a pay series using the given month-end policy
    pub fn into_series(self, policy: MonthEndPolicy) -> BilltrackResult<PaySeries> {
        let frequency: Frequency = self.frequency.parse().map_err(malformed(&self.name))?;
        let weekday = parse_weekday(&self.day_of_week).map_err(malformed(&self.name))?;
        let start_date = required_start(&self.name, self.start_date.as_deref())?;

        let amount = record_amount(&self.name, self.amount)?;

        Ok(PaySeries::new(
            self.name,
            amount,
            frequency,
            weekday,
            start_date,
        )
        .with_month_end_policy(policy))
    }
}

impl TryFrom<PayRecord> for PaySeries {
    type Error = BilltrackError;

    fn try_from(record: PayRecord) -> Result<Self, Self::Error> {
        record.into_series(MonthEndPolicy::default())
    }
}
