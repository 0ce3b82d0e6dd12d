//! Pay service
//!
//! Business logic for managing pay series.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{BilltrackError, BilltrackResult};
use crate::models::PaySeries;
use crate::storage::{PayRecord, Storage};

/// Service for pay series management
pub struct PayService<'a> {
    storage: &'a Storage,
}

impl<'a> PayService<'a> {
    /// Create a new pay service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn validate(pay: &PaySeries) -> BilltrackResult<()> {
        pay.validate()
            .map_err(|e| BilltrackError::Validation(e.to_string()))
    }

    /// Add a new pay series
    pub fn add(&self, pay: PaySeries) -> BilltrackResult<PaySeries> {
        Self::validate(&pay)?;

        if self.storage.pays.get_by_name(&pay.name)?.is_some() {
            return Err(BilltrackError::Duplicate {
                entity_type: "Pay series",
                identifier: pay.name,
            });
        }

        self.storage.pays.insert(pay.clone())?;
        self.storage.pays.save()?;

        self.storage
            .log_create(EntityType::PaySeries, &pay.name, &PayRecord::from(&pay))?;

        Ok(pay)
    }

    /// Replace the pay series called `name` with a new definition
    pub fn replace(&self, name: &str, pay: PaySeries) -> BilltrackResult<PaySeries> {
        Self::validate(&pay)?;

        if !pay.name.eq_ignore_ascii_case(name) && self.storage.pays.get_by_name(&pay.name)?.is_some() {
            return Err(BilltrackError::Duplicate {
                entity_type: "Pay series",
                identifier: pay.name,
            });
        }

        let before = self
            .storage
            .pays
            .replace(name, pay.clone())?
            .ok_or_else(|| BilltrackError::pay_not_found(name))?;
        self.storage.pays.save()?;

        self.storage.log_update(
            EntityType::PaySeries,
            &pay.name,
            &PayRecord::from(&before),
            &PayRecord::from(&pay),
        )?;

        Ok(pay)
    }

    /// Remove a pay series by name
    pub fn remove(&self, name: &str) -> BilltrackResult<PaySeries> {
        let removed = self
            .storage
            .pays
            .delete(name)?
            .ok_or_else(|| BilltrackError::pay_not_found(name))?;
        self.storage.pays.save()?;

        self.storage
            .log_delete(EntityType::PaySeries, &removed.name, &PayRecord::from(&removed))?;

        Ok(removed)
    }

    /// Get a pay series by name
    pub fn get(&self, name: &str) -> BilltrackResult<Option<PaySeries>> {
        self.storage.pays.get_by_name(name)
    }

    /// Get a pay series by name, failing if it does not exist
    pub fn find(&self, name: &str) -> BilltrackResult<PaySeries> {
        self.get(name)?
            .ok_or_else(|| BilltrackError::pay_not_found(name))
    }

    /// All pay series sorted by name
    pub fn list(&self) -> BilltrackResult<Vec<PaySeries>> {
        let mut pays = self.storage.pays.get_all()?;
        pays.sort_by_key(|p| p.name.to_lowercase());
        Ok(pays)
    }

    /// Pay dates of one series inside `[from, to]`
    pub fn occurrences(&self, name: &str, from: NaiveDate, to: NaiveDate) -> BilltrackResult<Vec<NaiveDate>> {
        Ok(self.find(name)?.occurrences_between(from, to))
    }

    /// The next pay date of every series on or after `from`, soonest first
    ///
    /// Series with nothing inside the lookahead sort last.
    pub fn next_pay_dates(&self, from: NaiveDate) -> BilltrackResult<Vec<(PaySeries, Option<NaiveDate>)>> {
        let mut upcoming: Vec<_> = self
            .list()?
            .into_iter()
            .map(|pay| {
                let next = pay.next_pay_date(from);
                (pay, next)
            })
            .collect();

        upcoming.sort_by_key(|(_, next)| next.unwrap_or(NaiveDate::MAX));
        Ok(upcoming)
    }
}
