//! Bill service
//!
//! Business logic for adding, replacing and removing bills, plus the
//! per-bill payment progress shown by `billtrack bill status`.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{BilltrackError, BilltrackResult};
use crate::models::BillSeries;
use crate::storage::{BillRecord, Storage};

/// Payment progress for one bill as of a reference date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillStatusRow {
    pub bill: BillSeries,
    pub made: u32,
    /// `None` for an open-ended bill
    pub total: Option<u32>,
    pub remaining: Option<u32>,
    /// "Payment {made} of {total}" or "Payment {made} of ?"
    pub status: String,
    pub next_due: Option<NaiveDate>,
}

/// Service for bill management
pub struct BillService<'a> {
    storage: &'a Storage,
}

impl<'a> BillService<'a> {
    /// Create a new bill service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn validate(bill: &BillSeries) -> BilltrackResult<()> {
        bill.validate()
            .map_err(|e| BilltrackError::Validation(e.to_string()))
    }

    /// Add a new bill
    pub fn add(&self, bill: BillSeries) -> BilltrackResult<BillSeries> {
        Self::validate(&bill)?;

        if self.storage.bills.get_by_name(&bill.name)?.is_some() {
            return Err(BilltrackError::Duplicate {
                entity_type: "Bill",
                identifier: bill.name,
            });
        }

        self.storage.bills.insert(bill.clone())?;
        self.storage.bills.save()?;

        self.storage
            .log_create(EntityType::Bill, &bill.name, &BillRecord::from(&bill))?;

        Ok(bill)
    }

    /// Replace the bill called `name` with a new definition
    pub fn replace(&self, name: &str, bill: BillSeries) -> BilltrackResult<BillSeries> {
        Self::validate(&bill)?;

        if !bill.name.eq_ignore_ascii_case(name) && self.storage.bills.get_by_name(&bill.name)?.is_some() {
            return Err(BilltrackError::Duplicate {
                entity_type: "Bill",
                identifier: bill.name,
            });
        }

        let before = self
            .storage
            .bills
            .replace(name, bill.clone())?
            .ok_or_else(|| BilltrackError::bill_not_found(name))?;
        self.storage.bills.save()?;

        self.storage.log_update(
            EntityType::Bill,
            &bill.name,
            &BillRecord::from(&before),
            &BillRecord::from(&bill),
        )?;

        Ok(bill)
    }

    /// Remove a bill by name
    pub fn remove(&self, name: &str) -> BilltrackResult<BillSeries> {
        let removed = self
            .storage
            .bills
            .delete(name)?
            .ok_or_else(|| BilltrackError::bill_not_found(name))?;
        self.storage.bills.save()?;

        self.storage
            .log_delete(EntityType::Bill, &removed.name, &BillRecord::from(&removed))?;

        Ok(removed)
    }

    /// Get a bill by name
    pub fn get(&self, name: &str) -> BilltrackResult<Option<BillSeries>> {
        self.storage.bills.get_by_name(name)
    }

    /// Get a bill by name, failing if it does not exist
    pub fn find(&self, name: &str) -> BilltrackResult<BillSeries> {
        self.get(name)?
            .ok_or_else(|| BilltrackError::bill_not_found(name))
    }

    /// All bills sorted by name
    pub fn list(&self) -> BilltrackResult<Vec<BillSeries>> {
        let mut bills = self.storage.bills.get_all()?;
        bills.sort_by_key(|b| b.name.to_lowercase());
        Ok(bills)
    }

    /// Payment dates of one bill inside `[from, to]`
    pub fn occurrences(&self, name: &str, from: NaiveDate, to: NaiveDate) -> BilltrackResult<Vec<NaiveDate>> {
        self.find(name)?.occurrences_between(from, to)
    }

    /// Payment progress of every bill as of `as_of`
    pub fn status_rows(&self, as_of: NaiveDate) -> BilltrackResult<Vec<BillStatusRow>> {
        self.list()?
            .into_iter()
            .map(|bill| {
                let made = bill.payments_made_by(as_of)?;
                let total = bill.total_payments()?;
                Ok(BillStatusRow {
                    made,
                    total,
                    remaining: total.map(|t| t.saturating_sub(made)),
                    status: bill.payment_status(as_of)?,
                    next_due: bill.next_due(as_of)?,
                    bill,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::BilltrackPaths;
    use crate::models::{Frequency, Money, MonthEndPolicy};
    use chrono::Weekday;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilltrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, MonthEndPolicy::default()).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gym() -> BillSeries {
        BillSeries::new("Gym", Money::from_cents(3000), Frequency::Weekly, Weekday::Mon, date(2025, 1, 6))
    }

    #[test]
    fn test_add_bill() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage);

        service.add(gym()).unwrap();
        assert_eq!(service.list().unwrap().len(), 1);
        assert!(service.get("gym").unwrap().is_some());

        let log = storage.audit().read_all().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].operation, Operation::Create);
        assert_eq!(log[0].entity_name, "Gym");
    }

    #[test]
    fn test_add_after_unreadable_load_keeps_original() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilltrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone(), MonthEndPolicy::default()).unwrap();
        let original = r#"[{"name":"Rent","amount":1200.0,"frequency":"monthly","day_of_week":"Monday","start_date":"2025-09-01","end_date":null},{"name":"Car","amount":300.0,"frequency":"monthly","day_of_week":"Monday","start_date":"2025-13-01","end_date":null}]"#;
        std::fs::write(paths.bills_file(), original).unwrap();
        storage.load_all().unwrap();

        BillService::new(&storage).add(gym()).unwrap();

        let kept = paths.bills_file().with_extension("json.bad");
        assert_eq!(std::fs::read_to_string(kept).unwrap(), original);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage);
        service.add(gym()).unwrap();

        let mut again = gym();
        again.name = "GYM".into();
        assert!(matches!(
            service.add(again),
            Err(BilltrackError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_add_invalid_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage);

        let mut bill = gym();
        bill.amount = Money::from_cents(-1);
        let err = service.add(bill).unwrap_err();
        assert!(err.is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_replace_and_remove() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage);
        service.add(gym()).unwrap();

        let replacement = gym().with_end_date(Some(date(2025, 6, 30)));
        service.replace("gym", replacement).unwrap();
        assert!(service.find("Gym").unwrap().is_bounded());

        let removed = service.remove("Gym").unwrap();
        assert_eq!(removed.name, "Gym");
        assert!(service.remove("Gym").unwrap_err().is_not_found());

        let ops: Vec<_> = storage
            .audit()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
    }

    #[test]
    fn test_replace_missing_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage);
        assert!(service.replace("Gym", gym()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_sorted_by_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage);

        for name in ["water", "Internet", "Car"] {
            let mut bill = gym();
            bill.name = name.into();
            service.add(bill).unwrap();
        }

        let names: Vec<_> = service.list().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Car", "Internet", "water"]);
    }

    #[test]
    fn test_status_rows() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage);
        service.add(gym().with_end_date(Some(date(2025, 3, 31)))).unwrap();

        let rows = service.status_rows(date(2025, 2, 1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].made, 4);
        assert_eq!(rows[0].total, Some(13));
        assert_eq!(rows[0].remaining, Some(9));
        assert_eq!(rows[0].status, "Payment 4 of 13");
        assert_eq!(rows[0].next_due, Some(date(2025, 2, 3)));
    }

    #[test]
    fn test_occurrences_by_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage);
        service.add(gym()).unwrap();

        let dates = service.occurrences("gym", date(2025, 1, 1), date(2025, 1, 14)).unwrap();
        assert_eq!(dates, vec![date(2025, 1, 6), date(2025, 1, 13)]);
        assert!(service
            .occurrences("rent", date(2025, 1, 1), date(2025, 1, 14))
            .unwrap_err()
            .is_not_found());
    }
}
