//! Bill CLI commands
//!
//! Implements CLI commands for managing recurring bills.

use std::str::FromStr;

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_date_or_today};
use crate::config::settings::Settings;
use crate::display::{format_bill_list, format_bill_status, format_date_list, separator};
use crate::error::BilltrackResult;
use crate::models::{parse_weekday, BillSeries, Frequency};
use crate::services::BillService;
use crate::storage::Storage;

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Add a new recurring bill
    Add {
        /// Bill name
        name: String,

        /// Amount per payment (e.g., "1200" or "45.50")
        amount: String,

        /// Cadence: weekly, biweekly or monthly
        #[arg(short, long)]
        frequency: String,

        /// Day of week the bill falls on (e.g., "Monday")
        #[arg(short, long)]
        day: String,

        /// First payment date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Last possible payment date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Edit a bill
    Edit {
        /// Bill name
        name: String,

        /// New name
        #[arg(long)]
        rename: Option<String>,

        /// New amount per payment
        #[arg(short, long)]
        amount: Option<String>,

        /// New cadence
        #[arg(short, long)]
        frequency: Option<String>,

        /// New day of week
        #[arg(short, long)]
        day: Option<String>,

        /// New first payment date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// New last payment date (YYYY-MM-DD, or "none" to clear it)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// List all bills
    #[command(alias = "ls")]
    List,

    /// Remove a bill
    #[command(alias = "rm")]
    Remove {
        /// Bill name
        name: String,
    },

    /// Show payment progress for every bill
    Status {
        /// Reference date (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List the payment dates of one bill in a range
    Occurrences {
        /// Bill name
        name: String,

        /// Range start (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },
}

/// Handle a bill command
pub fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillCommands,
) -> BilltrackResult<()> {
    let service = BillService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        BillCommands::Add {
            name,
            amount,
            frequency,
            day,
            start,
            end,
        } => {
            let end_date = end.as_deref().map(parse_date).transpose()?;
            let bill = BillSeries::new(
                name,
                parse_amount(&amount)?,
                Frequency::from_str(&frequency)?,
                parse_weekday(&day)?,
                parse_date(&start)?,
            )
            .with_end_date(end_date)
            .with_month_end_policy(settings.month_end_policy);

            let bill = service.add(bill)?;
            println!("Added bill: {}", bill.name);
            println!("  Amount:    {}", bill.amount.format_with_symbol(symbol));
            println!("  Frequency: {}", bill.frequency);
            println!("  Starts:    {}", bill.start_date.format(date_format));
            if let Some(end) = bill.end_date {
                println!("  Ends:      {}", end.format(date_format));
            }
        }

        BillCommands::Edit {
            name,
            rename,
            amount,
            frequency,
            day,
            start,
            end,
        } => {
            let mut bill = service.find(&name)?;

            if let Some(new_name) = rename {
                bill.name = new_name;
            }
            if let Some(amount) = amount {
                bill.amount = parse_amount(&amount)?;
            }
            if let Some(frequency) = frequency {
                bill.frequency = Frequency::from_str(&frequency)?;
            }
            if let Some(day) = day {
                bill.anchor_weekday = parse_weekday(&day)?;
            }
            if let Some(start) = start {
                bill.start_date = parse_date(&start)?;
            }
            if let Some(end) = end {
                bill.end_date = if end.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_date(&end)?)
                };
            }

            let updated = service.replace(&name, bill)?;
            println!("Updated bill: {}", updated.name);
            println!("  Amount:    {}", updated.amount.format_with_symbol(symbol));
            println!("  Frequency: {}", updated.frequency);
            println!("  Starts:    {}", updated.start_date.format(date_format));
            if let Some(end) = updated.end_date {
                println!("  Ends:      {}", end.format(date_format));
            }
        }

        BillCommands::List => {
            let bills = service.list()?;
            print!("{}", format_bill_list(&bills, symbol, date_format));
            if bills.is_empty() {
                println!();
                println!("Use 'billtrack bill add' to add one.");
            }
        }

        BillCommands::Remove { name } => {
            let removed = service.remove(&name)?;
            println!("Removed bill: {}", removed.name);
        }

        BillCommands::Status { date } => {
            let as_of = parse_date_or_today(date.as_deref())?;
            let rows = service.status_rows(as_of)?;
            println!("Bill status as of {}", as_of.format(date_format));
            println!("{}", separator(40));
            println!("{}", format_bill_status(&rows, symbol, date_format));
        }

        BillCommands::Occurrences { name, from, to } => {
            let dates = service.occurrences(&name, parse_date(&from)?, parse_date(&to)?)?;
            print!("{}", format_date_list(&dates, date_format));
            if dates.is_empty() {
                println!();
            }
        }
    }

    Ok(())
}
