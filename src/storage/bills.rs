//! Bill repository for JSON storage
//!
//! Bills are kept in memory in insertion order and written back as a JSON
//! array of flat records.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{BilltrackError, BilltrackResult};
use crate::models::{BillSeries, MonthEndPolicy};

use super::file_io::{keep_unreadable_copy, read_json, write_json_atomic};
use super::records::BillRecord;

/// Repository for bill persistence
pub struct BillRepository {
    path: PathBuf,
    month_end_policy: MonthEndPolicy,
    /// Set when the file on disk exists but could not be loaded
    unreadable: AtomicBool,
    bills: RwLock<Vec<BillSeries>>,
}

impl BillRepository {
    /// Create a new bill repository
    pub fn new(path: PathBuf, month_end_policy: MonthEndPolicy) -> Self {
        Self {
            path,
            month_end_policy,
            unreadable: AtomicBool::new(false),
            bills: RwLock::new(Vec::new()),
        }
    }

    /// Load bills from disk
    ///
    /// A missing file, a file that is not a JSON array of bill records, or a
    /// record that cannot become a bill all leave the repository empty.
    /// When the file exists but is unusable, the next save first copies it to
    /// `<name>.json.bad`.
    pub fn load(&self) -> BilltrackResult<()> {
        let loaded = read_json::<Vec<BillRecord>, _>(&self.path).and_then(|records| {
            records
                .into_iter()
                .map(|record| record.into_series(self.month_end_policy))
                .collect::<BilltrackResult<Vec<_>>>()
        });

        let loaded = match loaded {
            Ok(loaded) => {
                self.unreadable.store(false, Ordering::SeqCst);
                loaded
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding stored bills");
                self.unreadable.store(true, Ordering::SeqCst);
                Vec::new()
            }
        };

        let mut bills = self
            .bills
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *bills = loaded;

        Ok(())
    }

    /// Save bills to disk
    pub fn save(&self) -> BilltrackResult<()> {
        if self.unreadable.load(Ordering::SeqCst) {
            keep_unreadable_copy(&self.path)?;
            self.unreadable.store(false, Ordering::SeqCst);
        }

        let bills = self
            .bills
            .read()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let records: Vec<BillRecord> = bills.iter().map(BillRecord::from).collect();
        write_json_atomic(&self.path, &records)
    }

    /// Get a bill by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> BilltrackResult<Option<BillSeries>> {
        let bills = self
            .bills
            .read()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(bills.iter().find(|b| b.name.eq_ignore_ascii_case(name)).cloned())
    }

    /// Get all bills in stored order
    pub fn get_all(&self) -> BilltrackResult<Vec<BillSeries>> {
        let bills = self
            .bills
            .read()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(bills.clone())
    }

    /// Append a bill
    pub fn insert(&self, bill: BillSeries) -> BilltrackResult<()> {
        let mut bills = self
            .bills
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        bills.push(bill);
        Ok(())
    }

    /// Replace the bill called `name`, returning the old one
    pub fn replace(&self, name: &str, bill: BillSeries) -> BilltrackResult<Option<BillSeries>> {
        let mut bills = self
            .bills
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(bills
            .iter_mut()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .map(|slot| std::mem::replace(slot, bill)))
    }

    /// Remove the bill called `name`
    pub fn delete(&self, name: &str) -> BilltrackResult<Option<BillSeries>> {
        let mut bills = self
            .bills
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(bills
            .iter()
            .position(|b| b.name.eq_ignore_ascii_case(name))
            .map(|index| bills.remove(index)))
    }

    /// Replace every bill at once
    pub fn replace_all(&self, new_bills: Vec<BillSeries>) -> BilltrackResult<()> {
        let mut bills = self
            .bills
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *bills = new_bills;
        Ok(())
    }

    /// Number of bills held
    pub fn count(&self) -> BilltrackResult<usize> {
        let bills = self
            .bills
            .read()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(bills.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Money};
    use chrono::{NaiveDate, Weekday};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BillRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bills.json");
        let repo = BillRepository::new(path, MonthEndPolicy::default());
        (temp_dir, repo)
    }

    fn bill(name: &str) -> BillSeries {
        BillSeries::new(
            name,
            Money::from_cents(5000),
            Frequency::Monthly,
            Weekday::Mon,
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(bill("Internet")).unwrap();

        let found = repo.get_by_name("internet").unwrap().unwrap();
        assert_eq!(found.name, "Internet");
        assert!(repo.get_by_name("Water").unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(bill("Internet")).unwrap();
        repo.insert(bill("Water").with_end_date(NaiveDate::from_ymd_opt(2026, 1, 1))).unwrap();
        repo.save().unwrap();

        let repo2 = BillRepository::new(temp_dir.path().join("bills.json"), MonthEndPolicy::default());
        repo2.load().unwrap();
        assert_eq!(repo2.get_all().unwrap(), repo.get_all().unwrap());
    }

    #[test]
    fn test_saved_file_is_record_array() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(bill("Internet")).unwrap();
        repo.save().unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join("bills.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["frequency"], "monthly");
        assert_eq!(first["day_of_week"], "Monday");
        assert_eq!(first["amount"], 50.0);
        assert!(first["end_date"].is_null());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(bill("Internet")).unwrap();
        std::fs::write(temp_dir.path().join("bills.json"), "{ not valid").unwrap();

        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_bad_record_loads_empty() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("bills.json"),
            r#"[{"name":"Odd","amount":1.0,"frequency":"yearly","day_of_week":"Monday","start_date":"2025-01-06","end_date":null}]"#,
        )
        .unwrap();

        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_unreadable_file_is_kept_before_save() {
        let (temp_dir, repo) = create_test_repo();
        let path = temp_dir.path().join("bills.json");
        let original = r#"[
  {"name":"Rent","amount":1200.0,"frequency":"monthly","day_of_week":"Monday","start_date":"2025-09-01","end_date":null},
  {"name":"Car","amount":300.0,"frequency":"monthly","day_of_week":"Monday","start_date":"2025-13-01","end_date":null}
]"#;
        std::fs::write(&path, original).unwrap();

        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);

        repo.insert(bill("Gym")).unwrap();
        repo.save().unwrap();

        let kept = std::fs::read_to_string(temp_dir.path().join("bills.json.bad")).unwrap();
        assert_eq!(kept, original);

        let repo2 = BillRepository::new(path, MonthEndPolicy::default());
        repo2.load().unwrap();
        assert_eq!(repo2.get_all().unwrap().len(), 1);
        assert_eq!(repo2.get_all().unwrap()[0].name, "Gym");
    }

    #[test]
    fn test_missing_file_leaves_no_copy() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        repo.insert(bill("Gym")).unwrap();
        repo.save().unwrap();

        assert!(!temp_dir.path().join("bills.json.bad").exists());
    }

    #[test]
    fn test_replace_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(bill("Internet")).unwrap();

        let mut updated = bill("Internet");
        updated.amount = Money::from_cents(6000);
        let old = repo.replace("INTERNET", updated).unwrap().unwrap();
        assert_eq!(old.amount.cents(), 5000);
        assert_eq!(repo.get_by_name("Internet").unwrap().unwrap().amount.cents(), 6000);

        assert!(repo.delete("internet").unwrap().is_some());
        assert!(repo.delete("internet").unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
