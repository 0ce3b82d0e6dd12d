//! JSON Export functionality
//!
//! Exports both series collections to JSON with schema versioning, and reads
//! such an export back for import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{BilltrackError, BilltrackResult};
use crate::models::{BillSeries, MonthEndPolicy, PaySeries};
use crate::storage::{BillRecord, PayRecord, Storage};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: String,
    pub bills: Vec<BillRecord>,
    pub pay_periods: Vec<PayRecord>,
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub bill_count: usize,
    pub pay_count: usize,
    /// Earliest start date across both collections
    pub earliest_start: Option<String>,
}

fn check_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.to_lowercase()) {
            return Err(format!("Duplicate {} name: {}", kind, name));
        }
    }
    Ok(())
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> BilltrackResult<Self> {
        let bills: Vec<BillRecord> = storage.bills.get_all()?.iter().map(BillRecord::from).collect();
        let pay_periods: Vec<PayRecord> = storage.pays.get_all()?.iter().map(PayRecord::from).collect();

        let earliest_start = bills
            .iter()
            .filter_map(|b| b.start_date.clone())
            .chain(pay_periods.iter().filter_map(|p| p.start_date.clone()))
            .min();

        let metadata = ExportMetadata {
            bill_count: bills.len(),
            pay_count: pay_periods.len(),
            earliest_start,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            bills,
            pay_periods,
            metadata,
        })
    }

    /// Validate the export structure
    ///
    /// Every record must convert into a valid series and names must be
    /// unique within each collection.
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        check_unique("bill", self.bills.iter().map(|b| b.name.as_str()))?;
        check_unique("pay series", self.pay_periods.iter().map(|p| p.name.as_str()))?;

        self.to_series(MonthEndPolicy::default())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    /// Convert the records into series
    pub fn to_series(&self, policy: MonthEndPolicy) -> BilltrackResult<(Vec<BillSeries>, Vec<PaySeries>)> {
        let bills = self
            .bills
            .iter()
            .cloned()
            .map(|record| {
                let bill = record.into_series(policy)?;
                bill.validate()
                    .map_err(|e| BilltrackError::Validation(format!("{}: {}", bill.name, e)))?;
                Ok(bill)
            })
            .collect::<BilltrackResult<Vec<_>>>()?;

        let pays = self
            .pay_periods
            .iter()
            .cloned()
            .map(|record| {
                let pay = record.into_series(policy)?;
                pay.validate()
                    .map_err(|e| BilltrackError::Validation(format!("{}: {}", pay.name, e)))?;
                Ok(pay)
            })
            .collect::<BilltrackResult<Vec<_>>>()?;

        Ok((bills, pays))
    }

    /// Replace everything in storage with the contents of this export
    ///
    /// Each imported series is recorded in the audit log as a create.
    /// Returns the number of bills and pay series imported.
    pub fn restore_into(&self, storage: &Storage, policy: MonthEndPolicy) -> BilltrackResult<(usize, usize)> {
        self.validate().map_err(BilltrackError::Import)?;
        let (bills, pays) = self.to_series(policy)?;
        let counts = (bills.len(), pays.len());

        let entries: Vec<AuditEntry> = self
            .bills
            .iter()
            .map(|r| AuditEntry::create(EntityType::Bill, r.name.clone(), r))
            .chain(
                self.pay_periods
                    .iter()
                    .map(|r| AuditEntry::create(EntityType::PaySeries, r.name.clone(), r)),
            )
            .collect();

        storage.bills.replace_all(bills)?;
        storage.pays.replace_all(pays)?;
        storage.save_all()?;
        storage.audit().log_batch(&entries)?;

        tracing::info!(bills = counts.0, pays = counts.1, "import restored");
        Ok(counts)
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> BilltrackResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BilltrackError::Export(e.to_string()))
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> BilltrackResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| BilltrackError::Import(e.to_string()))?;

    export.validate().map_err(BilltrackError::Import)?;

    Ok(export)
}
