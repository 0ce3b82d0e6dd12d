//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod bill;
pub mod export;
pub mod pay;
pub mod week;

pub use bill::{handle_bill_command, BillCommands};
pub use export::{handle_export_command, handle_import_command, ExportFormat, ImportFormat};
pub use pay::{handle_pay_command, PayCommands};
pub use week::handle_week_command;

use chrono::{Local, NaiveDate};

use crate::error::{BilltrackError, BilltrackResult};
use crate::models::Money;

/// Parse a `YYYY-MM-DD` argument
pub(crate) fn parse_date(value: &str) -> BilltrackResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        BilltrackError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", value))
    })
}

/// Parse an optional date argument, defaulting to today's local date
pub(crate) fn parse_date_or_today(value: Option<&str>) -> BilltrackResult<NaiveDate> {
    match value {
        Some(v) => parse_date(v),
        None => Ok(Local::now().date_naive()),
    }
}

pub(crate) fn parse_amount(value: &str) -> BilltrackResult<Money> {
    Money::parse(value).map_err(|e| BilltrackError::Validation(format!("Invalid amount: {}", e)))
}
