//! Bill and pay series display formatting
//!
//! Formats series for terminal output in table views.

use chrono::NaiveDate;

use super::report::truncate;
use crate::models::{weekday_name, BillSeries, PaySeries};
use crate::services::BillStatusRow;

const NAME_WIDTH_MAX: usize = 30;

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, NAME_WIDTH_MAX)
}

fn format_optional_date(date: Option<NaiveDate>, date_format: &str) -> String {
    date.map(|d| d.format(date_format).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format a list of bills as a table
pub fn format_bill_list(bills: &[BillSeries], symbol: &str, date_format: &str) -> String {
    if bills.is_empty() {
        return "No bills found.".to_string();
    }

    let width = name_width(bills.iter().map(|b| b.name.as_str()));
    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:>12}  {:<9}  {:<9}  {:<10}  {:<10}\n",
        "Name", "Amount", "Frequency", "Day", "Start", "End",
        width = width,
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->12}  {:-<9}  {:-<9}  {:-<10}  {:-<10}\n",
        "", "", "", "", "", "",
        width = width,
    ));

    for bill in bills {
        output.push_str(&format!(
            "{:<width$}  {:>12}  {:<9}  {:<9}  {:<10}  {:<10}\n",
            truncate(&bill.name, width),
            bill.amount.format_with_symbol(symbol),
            bill.frequency,
            weekday_name(bill.anchor_weekday),
            bill.start_date.format(date_format).to_string(),
            format_optional_date(bill.end_date, date_format),
            width = width,
        ));
    }

    output
}

/// Format per-bill payment progress as a table
pub fn format_bill_status(rows: &[BillStatusRow], symbol: &str, date_format: &str) -> String {
    if rows.is_empty() {
        return "No bills found.".to_string();
    }

    let width = name_width(rows.iter().map(|r| r.bill.name.as_str()));
    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:>12}  {:<20}  {:>9}  {:<10}\n",
        "Name", "Amount", "Status", "Remaining", "Next due",
        width = width,
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->12}  {:-<20}  {:->9}  {:-<10}\n",
        "", "", "", "", "",
        width = width,
    ));

    for row in rows {
        let remaining = row
            .remaining
            .map(|r| r.to_string())
            .unwrap_or_else(|| "?".to_string());

        output.push_str(&format!(
            "{:<width$}  {:>12}  {:<20}  {:>9}  {:<10}\n",
            truncate(&row.bill.name, width),
            row.bill.amount.format_with_symbol(symbol),
            row.status,
            remaining,
            format_optional_date(row.next_due, date_format),
            width = width,
        ));
    }

    output
}

/// Format a list of pay series as a table
pub fn format_pay_list(pays: &[PaySeries], symbol: &str, date_format: &str) -> String {
    if pays.is_empty() {
        return "No pay series found.".to_string();
    }

    let width = name_width(pays.iter().map(|p| p.name.as_str()));
    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:>12}  {:<9}  {:<9}  {:<10}\n",
        "Name", "Amount", "Frequency", "Day", "Start",
        width = width,
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->12}  {:-<9}  {:-<9}  {:-<10}\n",
        "", "", "", "", "",
        width = width,
    ));

    for pay in pays {
        output.push_str(&format!(
            "{:<width$}  {:>12}  {:<9}  {:<9}  {:<10}\n",
            truncate(&pay.name, width),
            pay.amount.format_with_symbol(symbol),
            pay.frequency,
            weekday_name(pay.anchor_weekday),
            pay.start_date.format(date_format).to_string(),
            width = width,
        ));
    }

    output
}

/// Format each series' next pay date
pub fn format_next_pay(upcoming: &[(PaySeries, Option<NaiveDate>)], symbol: &str, date_format: &str) -> String {
    if upcoming.is_empty() {
        return "No pay series found.".to_string();
    }

    let width = name_width(upcoming.iter().map(|(p, _)| p.name.as_str()));
    let mut output = String::new();
    for (pay, next) in upcoming {
        output.push_str(&format!(
            "{:<width$}  {:>12}  {}\n",
            truncate(&pay.name, width),
            pay.amount.format_with_symbol(symbol),
            format_optional_date(*next, date_format),
            width = width,
        ));
    }
    output
}

/// Format a list of dates, one per line, with weekday names
pub fn format_date_list(dates: &[NaiveDate], date_format: &str) -> String {
    if dates.is_empty() {
        return "No dates in range.".to_string();
    }

    dates
        .iter()
        .map(|d| {
            use chrono::Datelike;
            format!("{}  {}\n", d.format(date_format), weekday_name(d.weekday()))
        })
        .collect()
}
