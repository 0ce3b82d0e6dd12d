//! CLI commands for data export and import
//!
//! CSV exports the occurrences of a date range; JSON and YAML dump (and
//! restore) both series collections.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::ValueEnum;

use super::parse_date;
use crate::config::settings::Settings;
use crate::error::{BilltrackError, BilltrackResult};
use crate::export::{csv, json, yaml};
use crate::models::week_window;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (occurrences in a date range)
    Csv,
    /// JSON format (full database)
    Json,
    /// YAML format (full database, human-readable)
    Yaml,
}

/// Import format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ImportFormat {
    Json,
    Yaml,
}

fn open_output(output: Option<&Path>) -> BilltrackResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BilltrackError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Handle an export command
///
/// Output goes to stdout when no path is given. The CSV range defaults to
/// the current week.
pub fn handle_export_command(
    storage: &Storage,
    format: ExportFormat,
    output: Option<PathBuf>,
    from: Option<String>,
    to: Option<String>,
    pretty: bool,
) -> BilltrackResult<()> {
    let mut writer = open_output(output.as_deref())?;

    match format {
        ExportFormat::Csv => {
            let window = week_window(Local::now().date_naive());
            let start = from.as_deref().map(parse_date).transpose()?.unwrap_or(window.start);
            let end = to.as_deref().map(parse_date).transpose()?.unwrap_or(window.end);

            let bills = storage.bills.get_all()?;
            let pays = storage.pays.get_all()?;
            let count = csv::export_occurrences_csv(&bills, &pays, start, end, &mut writer)?;

            if let Some(path) = &output {
                println!("Exported {} occurrences to: {}", count, path.display());
            }
        }
        ExportFormat::Json => {
            json::export_full_json(storage, &mut writer, pretty)?;
            writer.write_all(b"\n")?;
            if let Some(path) = &output {
                println!("Full database exported to: {}", path.display());
            }
        }
        ExportFormat::Yaml => {
            yaml::export_full_yaml(storage, &mut writer)?;
            if let Some(path) = &output {
                println!("Full database exported to: {}", path.display());
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Handle an import command, replacing all stored bills and pay series
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    format: ImportFormat,
    path: PathBuf,
) -> BilltrackResult<()> {
    let contents = fs::read_to_string(&path).map_err(|e| {
        BilltrackError::Import(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let export = match format {
        ImportFormat::Json => json::import_from_json(&contents)?,
        ImportFormat::Yaml => yaml::import_from_yaml(&contents)?,
    };

    let (bills, pays) = export.restore_into(storage, settings.month_end_policy)?;
    println!(
        "Imported {} bills and {} pay series from: {}",
        bills,
        pays,
        path.display()
    );

    Ok(())
}
