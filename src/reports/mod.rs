//! Reports module for billtrack
//!
//! Provides the weekly snapshot of bills and pay around a reference date.

pub mod weekly;

pub use weekly::{
    balance_summary, partition_bills, partition_pay, BalanceSummary, BillOccurrence,
    PayOccurrence, WeeklyReport,
};
