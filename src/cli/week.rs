//! Weekly snapshot command

use std::io::IsTerminal;

use super::parse_date_or_today;
use crate::config::settings::Settings;
use crate::error::BilltrackResult;
use crate::reports::WeeklyReport;
use crate::storage::Storage;

/// Print the bills, pay and disposable income of the week containing `date`
pub fn handle_week_command(
    storage: &Storage,
    settings: &Settings,
    date: Option<String>,
) -> BilltrackResult<()> {
    let today = parse_date_or_today(date.as_deref())?;
    let bills = storage.bills.get_all()?;
    let pays = storage.pays.get_all()?;

    let report = WeeklyReport::generate(&pays, &bills, today)?;
    tracing::debug!(window = %report.window, empty = report.is_empty(), "weekly report built");

    let color = std::io::stdout().is_terminal();
    print!("{}", report.format_terminal(&settings.currency_symbol, color));
    Ok(())
}
