//! Pay series repository for JSON storage
//!
//! Pay series are kept in memory in insertion order and written back as a JSON
//! array of flat records.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{BilltrackError, BilltrackResult};
use crate::models::{MonthEndPolicy, PaySeries};

use super::file_io::{keep_unreadable_copy, read_json, write_json_atomic};
use super::records::PayRecord;

/// Repository for pay series persistence
pub struct PayRepository {
    path: PathBuf,
    month_end_policy: MonthEndPolicy,
    /// Set when the file on disk exists but could not be loaded
    unreadable: AtomicBool,
    pays: RwLock<Vec<PaySeries>>,
}

impl PayRepository {
    /// Create a new pay series repository
    pub fn new(path: PathBuf, month_end_policy: MonthEndPolicy) -> Self {
        Self {
            path,
            month_end_policy,
            unreadable: AtomicBool::new(false),
            pays: RwLock::new(Vec::new()),
        }
    }

    /// Load pay series from disk
    ///
    /// A missing file, a file that is not a JSON array of pay records, or a
    /// record that cannot become a pay series all leave the repository empty.
    /// When the file exists but is unusable, the next save first copies it to
    /// `<name>.json.bad`.
    pub fn load(&self) -> BilltrackResult<()> {
        let loaded = read_json::<Vec<PayRecord>, _>(&self.path).and_then(|records| {
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
                tracing::warn!(path = %self.path.display(), error = %e, "discarding stored pays");
                self.unreadable.store(true, Ordering::SeqCst);
                Vec::new()
            }
        };

        let mut pays = self
            .pays
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *pays = loaded;

        Ok(())
    }

    /// Save pays to disk
    pub fn save(&self) -> BilltrackResult<()> {
        if self.unreadable.load(Ordering::SeqCst) {
            keep_unreadable_copy(&self.path)?;
            self.unreadable.store(false, Ordering::SeqCst);
        }

        let pays = self
            .pays
            .read()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let records: Vec<PayRecord> = pays.iter().map(PayRecord::from).collect();
        write_json_atomic(&self.path, &records)
    }

    /// Get a pay series by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> BilltrackResult<Option<PaySeries>> {
        let pays = self
            .pays
            .read()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(pays.iter().find(|p| p.name.eq_ignore_ascii_case(name)).cloned())
    }

    /// Get all pays in stored order
    pub fn get_all(&self) -> BilltrackResult<Vec<PaySeries>> {
        let pays = self
            .pays
            .read()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(pays.clone())
    }

    /// Append a pay series
    pub fn insert(&self, pay: PaySeries) -> BilltrackResult<()> {
        let mut pays = self
            .pays
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        pays.push(pay);
        Ok(())
    }

    /// Replace the pay series called `name`, returning the old one
    pub fn replace(&self, name: &str, pay: PaySeries) -> BilltrackResult<Option<PaySeries>> {
        let mut pays = self
            .pays
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(pays
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|slot| std::mem::replace(slot, pay)))
    }

    /// Remove the pay series called `name`
    pub fn delete(&self, name: &str) -> BilltrackResult<Option<PaySeries>> {
        let mut pays = self
            .pays
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(pays
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
            .map(|index| pays.remove(index)))
    }

    /// Replace every pay series at once
    pub fn replace_all(&self, new_pays: Vec<PaySeries>) -> BilltrackResult<()> {
        let mut pays = self
            .pays
            .write()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *pays = new_pays;
        Ok(())
    }

    /// Number of pays held
    pub fn count(&self) -> BilltrackResult<usize> {
        let pays = self
            .pays
            .read()
            .map_err(|e| BilltrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(pays.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Money};
    use chrono::{NaiveDate, Weekday};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PayRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pay_periods.json");
        let repo = PayRepository::new(path, MonthEndPolicy::default());
        (temp_dir, repo)
    }

    fn pay(name: &str) -> PaySeries {
        PaySeries::new(
            name,
            Money::from_cents(100000),
            Frequency::Biweekly,
            Weekday::Fri,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        )
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(pay("Job")).unwrap();
        repo.insert(pay("Freelance")).unwrap();
        repo.save().unwrap();

        let repo2 = PayRepository::new(
            temp_dir.path().join("pay_periods.json"),
            MonthEndPolicy::ClampTo28,
        );
        repo2.load().unwrap();
        let loaded = repo2.get_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "Job");
        assert_eq!(loaded[1].month_end_policy, MonthEndPolicy::ClampTo28);
    }

    #[test]
    fn test_saved_file_has_no_end_date() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(pay("Job")).unwrap();
        repo.save().unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join("pay_periods.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["frequency"], "biweekly");
        assert_eq!(first["start_date"], "2025-01-10");
        assert!(first.get("end_date").is_none());
    }

    #[test]
    fn test_null_start_date_loads_empty() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("pay_periods.json"),
            r#"[{"name":"Job","amount":1000.0,"frequency":"weekly","day_of_week":"Friday","start_date":null}]"#,
        )
        .unwrap();

        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_unreadable_file_is_kept_before_save() {
        let (temp_dir, repo) = create_test_repo();
        let path = temp_dir.path().join("pay_periods.json");
        std::fs::write(&path, "[{\"name\": \"Job\",").unwrap();

        repo.load().unwrap();
        repo.insert(pay("Freelance")).unwrap();
        repo.save().unwrap();
        repo.save().unwrap();

        let kept = std::fs::read_to_string(temp_dir.path().join("pay_periods.json.bad")).unwrap();
        assert_eq!(kept, "[{\"name\": \"Job\",");
        assert!(std::fs::read_to_string(&path).unwrap().contains("Freelance"));
    }

    #[test]
    fn test_replace_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(pay("Job")).unwrap();

        let mut raise = pay("Job");
        raise.amount = Money::from_cents(110000);
        assert!(repo.replace("job", raise).unwrap().is_some());
        assert_eq!(repo.get_by_name("JOB").unwrap().unwrap().amount.cents(), 110000);
        assert!(repo.replace("Other", pay("Other")).unwrap().is_none());

        assert!(repo.delete("Job").unwrap().is_some());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
