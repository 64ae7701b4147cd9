//! Daily budget repository
//!
//! Stores one budget entry per (user, date) in budgets.json. Writes are
//! upserts: the last write for a date wins.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::models::{BudgetEntry, BudgetMap, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::records::{self, Collection};

/// Composite key for budget entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BudgetKey {
    pub user_id: UserId,
    pub date: NaiveDate,
}

impl BudgetKey {
    pub fn new(user_id: UserId, date: NaiveDate) -> Self {
        Self { user_id, date }
    }
}

/// Repository for daily budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    entries: RwLock<HashMap<BudgetKey, BudgetEntry>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Load and validate every record; a malformed record rejects the load
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: Collection = read_json(&self.path)?;

        let parsed = file_data
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| records::budget_from_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.clear();
        for entry in parsed {
            // duplicate keys in the file: later record wins, as with upsert
            entries.insert(BudgetKey::new(entry.user_id, entry.date), entry);
        }

        Ok(())
    }

    /// Insert or replace the budget for a user's date. The in-memory entry
    /// only changes once the file write has succeeded.
    pub fn upsert(&self, entry: BudgetEntry) -> Result<Option<BudgetEntry>, LedgerError> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        let key = BudgetKey::new(entry.user_id, entry.date);

        let mut snapshot: Vec<&BudgetEntry> =
            entries.iter().filter(|(k, _)| **k != key).map(|(_, v)| v).collect();
        snapshot.push(&entry);
        snapshot.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        let collection = Collection {
            records: snapshot.into_iter().map(records::budget_to_record).collect(),
        };
        write_json_atomic(&self.path, &collection)?;

        Ok(entries.insert(key, entry))
    }

    pub fn get(&self, user_id: UserId, date: NaiveDate) -> Result<Option<BudgetEntry>, LedgerError> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.get(&BudgetKey::new(user_id, date)).cloned())
    }

    /// Date -> amount map of one user's budgets
    pub fn map_for_user(&self, user_id: UserId) -> Result<BudgetMap, LedgerError> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries
            .values()
            .filter(|e| e.user_id == user_id)
            .map(|e| (e.date, e.amount))
            .collect())
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.len())
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> LedgerError {
    LedgerError::Storage(format!("Failed to acquire lock: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_upsert_replaces_same_date() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();

        let previous = repo
            .upsert(BudgetEntry::new(user, day(15), Money::from_cents(5000)))
            .unwrap();
        assert!(previous.is_none());

        let previous = repo
            .upsert(BudgetEntry::new(user, day(15), Money::from_cents(7500)))
            .unwrap();
        assert_eq!(previous.unwrap().amount.cents(), 5000);

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get(user, day(15)).unwrap().unwrap().amount.cents(), 7500);
    }

    #[test]
    fn test_map_for_user_is_scoped() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = UserId::new();
        let bob = UserId::new();

        repo.upsert(BudgetEntry::new(alice, day(1), Money::from_cents(100))).unwrap();
        repo.upsert(BudgetEntry::new(alice, day(2), Money::from_cents(200))).unwrap();
        repo.upsert(BudgetEntry::new(bob, day(1), Money::from_cents(999))).unwrap();

        let map = repo.map_for_user(alice).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&day(1)].cents(), 100);
    }

    #[test]
    fn test_reload_from_disk() {
        let (temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        repo.upsert(BudgetEntry::new(user, day(20), Money::from_cents(4250))).unwrap();

        let repo2 = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(user, day(20)).unwrap().unwrap().amount.cents(), 4250);
    }
}
