//! Export module for billtrack
//!
//! - CSV: every bill and pay occurrence in a date range (spreadsheet-compatible)
//! - JSON: machine-readable dump of both collections, importable
//! - YAML: human-readable dump of both collections, importable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_occurrences_csv, occurrence_rows, OccurrenceKind, OccurrenceRow};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
