//! Storage layer for billtrack
//!
//! Bill and pay collections live in their own JSON files, written
//! atomically. Every mutation made through the services is also recorded in
//! the audit log.

pub mod bills;
pub mod file_io;
pub mod pays;
pub mod records;

pub use bills::BillRepository;
pub use file_io::{keep_unreadable_copy, read_json, write_json_atomic};
pub use pays::PayRepository;
pub use records::{BillRecord, PayRecord};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BilltrackPaths;
use crate::error::BilltrackError;
use crate::models::MonthEndPolicy;

/// Main storage coordinator that provides access to both repositories
pub struct Storage {
    paths: BilltrackPaths,
    pub bills: BillRepository,
    pub pays: PayRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    ///
    /// Series loaded from disk take the given month-end policy.
    pub fn new(paths: BilltrackPaths, month_end_policy: MonthEndPolicy) -> Result<Self, BilltrackError> {
        paths.ensure_directories()?;

        Ok(Self {
            bills: BillRepository::new(paths.bills_file(), month_end_policy),
            pays: PayRepository::new(paths.pay_periods_file(), month_end_policy),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BilltrackPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BilltrackError> {
        self.bills.load()?;
        self.pays.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BilltrackError> {
        self.bills.save()?;
        self.pays.save()?;
        Ok(())
    }

    /// The audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a newly added series
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        name: &str,
        record: &T,
    ) -> Result<(), BilltrackError> {
        self.audit.log(&AuditEntry::create(entity_type, name, record))
    }

    /// Record a replaced series
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        name: &str,
        before: &T,
        after: &T,
    ) -> Result<(), BilltrackError> {
        self.audit.log(&AuditEntry::update(entity_type, name, before, after))
    }

    /// Record a removed series
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        name: &str,
        record: &T,
    ) -> Result<(), BilltrackError> {
        self.audit.log(&AuditEntry::delete(entity_type, name, record))
    }
}
