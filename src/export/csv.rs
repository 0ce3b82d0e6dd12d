//! CSV Export functionality
//!
//! Exports every bill and pay occurrence in a date range, one row per
//! occurrence, for use in a spreadsheet.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::error::{BilltrackError, BilltrackResult};
use crate::models::{BillSeries, PaySeries};

/// Which side of the ledger an occurrence is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceKind {
    Pay,
    Bill,
}

/// One exported row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccurrenceRow {
    pub date: NaiveDate,
    pub kind: OccurrenceKind,
    pub name: String,
    /// Dollars, two decimals
    pub amount: String,
}

/// Collect the occurrence rows of both collections in `[start, end]`
///
/// Rows are ordered by date; on the same date pay comes before bills, then
/// by name.
pub fn occurrence_rows(
    bills: &[BillSeries],
    pays: &[PaySeries],
    start: NaiveDate,
    end: NaiveDate,
) -> BilltrackResult<Vec<OccurrenceRow>> {
    let mut rows = Vec::new();

    for bill in bills {
        for date in bill.occurrences_between(start, end)? {
            rows.push(OccurrenceRow {
                date,
                kind: OccurrenceKind::Bill,
                name: bill.name.clone(),
                amount: format!("{:.2}", bill.amount.to_dollars_f64()),
            });
        }
    }

    for pay in pays {
        for date in pay.occurrences_between(start, end) {
            rows.push(OccurrenceRow {
                date,
                kind: OccurrenceKind::Pay,
                name: pay.name.clone(),
                amount: format!("{:.2}", pay.amount.to_dollars_f64()),
            });
        }
    }

    rows.sort_by(|a, b| {
        (a.date, a.kind, &a.name).cmp(&(b.date, b.kind, &b.name))
    });
    Ok(rows)
}

/// Write the occurrences of `[start, end]` as CSV with a header row
pub fn export_occurrences_csv<W: Write>(
    bills: &[BillSeries],
    pays: &[PaySeries],
    start: NaiveDate,
    end: NaiveDate,
    writer: W,
) -> BilltrackResult<usize> {
    let rows = occurrence_rows(bills, pays, start, end)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv_writer
            .write_record(["date", "kind", "name", "amount"])
            .map_err(|e| BilltrackError::Export(e.to_string()))?;
    }
    for row in &rows {
        csv_writer
            .serialize(row)
            .map_err(|e| BilltrackError::Export(e.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|e| BilltrackError::Export(e.to_string()))?;

    Ok(rows.len())
}
