//! Display formatting for terminal output
//!
//! Plain-text tables for bills, pay series and dates, plus colored money
//! for terminal summaries.

pub mod report;
pub mod series;

pub use report::{format_money_colored, separator, truncate};
pub use series::{
    format_bill_list, format_bill_status, format_date_list, format_next_pay, format_pay_list,
};
