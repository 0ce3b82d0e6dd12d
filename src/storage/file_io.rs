//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BilltrackError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, BilltrackError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| BilltrackError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| BilltrackError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Copy an unreadable data file aside before it gets overwritten
///
/// The copy sits next to the original as `<name>.json.bad`. An older copy
/// is replaced.
pub fn keep_unreadable_copy<P: AsRef<Path>>(path: P) -> Result<PathBuf, BilltrackError> {
    let path = path.as_ref();
    let kept = path.with_extension("json.bad");

    fs::copy(path, &kept).map_err(|e| {
        BilltrackError::Storage(format!(
            "Failed to keep a copy of {} at {}: {}",
            path.display(),
            kept.display(),
            e
        ))
    })?;

    tracing::warn!(path = %path.display(), kept = %kept.display(), "kept unreadable data file");
    Ok(kept)
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BilltrackError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BilltrackError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| BilltrackError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| BilltrackError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| BilltrackError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| BilltrackError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BilltrackError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    tracing::debug!(path = %path.display(), "saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::BillRecord;
    use tempfile::TempDir;

    fn rent() -> Vec<BillRecord> {
        vec![BillRecord {
            name: "Rent".into(),
            amount: 1200.0,
            frequency: "monthly".into(),
            day_of_week: "Monday".into(),
            start_date: Some("2025-09-01".into()),
            end_date: None,
        }]
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let records: Vec<BillRecord> = read_json(temp_dir.path().join("bills.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_atomic_write_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("bills.json");

        write_json_atomic(&path, &rent()).unwrap();

        assert!(!temp_dir.path().join("data").join("bills.json.tmp").exists());
        let loaded: Vec<BillRecord> = read_json(&path).unwrap();
        assert_eq!(loaded, rent());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"end_date\": null"));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pay_periods.json");

        fs::write(&path, "not json at all").unwrap();
        assert!(read_json::<Vec<BillRecord>, _>(&path).is_err());

        // An object where an array is expected
        fs::write(&path, r#"{"name": "Rent"}"#).unwrap();
        assert!(read_json::<Vec<BillRecord>, _>(&path).is_err());
    }

    #[test]
    fn test_keep_unreadable_copy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pay_periods.json");
        fs::write(&path, "[{\"name\": \"Job\"").unwrap();

        let kept = keep_unreadable_copy(&path).unwrap();
        assert_eq!(kept, temp_dir.path().join("pay_periods.json.bad"));
        assert_eq!(fs::read(&kept).unwrap(), fs::read(&path).unwrap());

        assert!(keep_unreadable_copy(temp_dir.path().join("missing.json")).is_err());
    }
}
