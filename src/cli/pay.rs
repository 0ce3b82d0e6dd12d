//! Pay CLI commands
//!
//! Implements CLI commands for managing recurring pay.

use std::str::FromStr;

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_date_or_today};
use crate::config::settings::Settings;
use crate::display::{format_date_list, format_next_pay, format_pay_list};
use crate::error::BilltrackResult;
use crate::models::{parse_weekday, Frequency, PaySeries};
use crate::services::PayService;
use crate::storage::Storage;

/// Pay subcommands
#[derive(Subcommand)]
pub enum PayCommands {
    /// Add a new pay series
    Add {
        /// Pay series name (e.g., employer)
        name: String,

        /// Amount per paycheck
        amount: String,

        /// Cadence: weekly, biweekly or monthly
        #[arg(short, long)]
        frequency: String,

        /// Payday (e.g., "Friday")
        #[arg(short, long)]
        day: String,

        /// First pay date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,
    },

    /// Edit a pay series
    Edit {
        /// Pay series name
        name: String,

        /// New name
        #[arg(long)]
        rename: Option<String>,

        /// New amount per paycheck
        #[arg(short, long)]
        amount: Option<String>,

        /// New cadence
        #[arg(short, long)]
        frequency: Option<String>,

        /// New payday
        #[arg(short, long)]
        day: Option<String>,

        /// New first pay date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,
    },

    /// List all pay series
    #[command(alias = "ls")]
    List,

    /// Remove a pay series
    #[command(alias = "rm")]
    Remove {
        /// Pay series name
        name: String,
    },

    /// List the pay dates of one series in a range
    Occurrences {
        /// Pay series name
        name: String,

        /// Range start (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Show the next pay date of every series
    Next {
        /// Reference date (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

/// Handle a pay command
pub fn handle_pay_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PayCommands,
) -> BilltrackResult<()> {
    let service = PayService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        PayCommands::Add {
            name,
            amount,
            frequency,
            day,
            start,
        } => {
            let pay = PaySeries::new(
                name,
                parse_amount(&amount)?,
                Frequency::from_str(&frequency)?,
                parse_weekday(&day)?,
                parse_date(&start)?,
            )
            .with_month_end_policy(settings.month_end_policy);

            let pay = service.add(pay)?;
            println!("Added pay series: {}", pay);
        }

        PayCommands::Edit {
            name,
            rename,
            amount,
            frequency,
            day,
            start,
        } => {
            let mut pay = service.find(&name)?;

            if let Some(new_name) = rename {
                pay.name = new_name;
            }
            if let Some(amount) = amount {
                pay.amount = parse_amount(&amount)?;
            }
            if let Some(frequency) = frequency {
                pay.frequency = Frequency::from_str(&frequency)?;
            }
            if let Some(day) = day {
                pay.anchor_weekday = parse_weekday(&day)?;
            }
            if let Some(start) = start {
                pay.start_date = parse_date(&start)?;
            }

            let updated = service.replace(&name, pay)?;
            println!("Updated pay series: {}", updated);
        }

        PayCommands::List => {
            let pays = service.list()?;
            print!("{}", format_pay_list(&pays, symbol, date_format));
            if pays.is_empty() {
                println!();
                println!("Use 'billtrack pay add' to add one.");
            }
        }

        PayCommands::Remove { name } => {
            let removed = service.remove(&name)?;
            println!("Removed pay series: {}", removed.name);
        }

        PayCommands::Occurrences { name, from, to } => {
            let dates = service.occurrences(&name, parse_date(&from)?, parse_date(&to)?)?;
            print!("{}", format_date_list(&dates, date_format));
            if dates.is_empty() {
                println!();
            }
        }

        PayCommands::Next { date } => {
            let from = parse_date_or_today(date.as_deref())?;
            let upcoming = service.next_pay_dates(from)?;
            print!("{}", format_next_pay(&upcoming, symbol, date_format));
            if upcoming.is_empty() {
                println!();
            }
        }
    }

    Ok(())
}
