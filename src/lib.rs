//! billtrack - recurring bills, paychecks and weekly disposable income
//!
//! This library provides the core of the billtrack command-line tool. Bills
//! and pay are modelled as recurring series; the weekly report partitions
//! their occurrences around a reference date and sums what is left to spend.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Calendar helpers, money and the bill/pay series
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `reports`: Weekly snapshot and balance summary
//! - `audit`: Audit logging system
//! - `export`: CSV, JSON and YAML export/import
//!
//! # Example
//!
//! ```rust,ignore
//! use billtrack::config::{paths::BilltrackPaths, settings::Settings};
//! use billtrack::storage::Storage;
//!
//! let paths = BilltrackPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths, settings.month_end_policy)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BilltrackError, BilltrackResult};

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "BILLTRACK_LOG";

static INIT_TRACING: Once = Once::new();

/// Install the stderr tracing subscriber
///
/// Only the first call has any effect.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("billtrack=warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
