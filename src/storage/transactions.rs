//! Transaction repository
//!
//! Append-only store of transactions for all users, persisted to
//! transactions.json. Reads are always scoped to one user.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Transaction, TransactionId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::records::{self, Collection};

/// Repository for transaction persistence, indexed by owner
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: user_id -> transaction ids
    by_user: RwLock<HashMap<UserId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Load and validate every record. On any malformed record the load is
    /// rejected and the in-memory state is left untouched.
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: Collection = read_json(&self.path)?;

        let parsed = file_data
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| records::transaction_from_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        data.clear();
        by_user.clear();
        for txn in parsed {
            by_user.entry(txn.user_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Persist a new transaction. The record is only visible in memory once
    /// the file write has succeeded.
    pub fn insert(&self, txn: Transaction) -> Result<(), LedgerError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        if data.contains_key(&txn.id) {
            return Err(LedgerError::Storage(format!(
                "Transaction {} already exists",
                txn.id
            )));
        }

        let mut snapshot: Vec<&Transaction> = data.values().collect();
        snapshot.push(&txn);
        write_collection(&self.path, snapshot)?;

        by_user.entry(txn.user_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All transactions of a user, newest date first
    pub fn list_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, LedgerError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_user = self.by_user.read().map_err(lock_error)?;

        let ids = by_user.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

fn write_collection(path: &Path, transactions: Vec<&Transaction>) -> Result<(), LedgerError> {
    let mut ordered: Vec<Transaction> = transactions.into_iter().cloned().collect();
    sort_newest_first(&mut ordered);

    let collection = Collection {
        records: ordered.iter().map(records::transaction_to_record).collect(),
    };
    write_json_atomic(path, &collection)
}

fn lock_error<E: std::fmt::Display>(e: E) -> LedgerError {
    LedgerError::Storage(format!("Failed to acquire lock: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, NewTransaction, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn expense(user: UserId, day: u32, cents: i64) -> Transaction {
        Transaction::from_new(
            user,
            NewTransaction::new(
                TransactionType::Expense,
                Money::from_cents(cents),
                "Food",
                NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            ),
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_list_scoped_to_user() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = UserId::new();
        let bob = UserId::new();

        repo.insert(expense(alice, 10, 100)).unwrap();
        repo.insert(expense(alice, 12, 200)).unwrap();
        repo.insert(expense(bob, 11, 300)).unwrap();

        let alice_txns = repo.list_for_user(alice).unwrap();
        assert_eq!(alice_txns.len(), 2);
        // newest first
        assert_eq!(alice_txns[0].date.to_string(), "2024-01-12");
        assert_eq!(repo.list_for_user(bob).unwrap().len(), 1);
        assert!(repo.list_for_user(UserId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        let txn = expense(UserId::new(), 10, 100);
        repo.insert(txn.clone()).unwrap();
        assert!(repo.insert(txn).is_err());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_reload_from_disk() {
        let (temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let txn = expense(user, 15, 8543);
        let id = txn.id;
        repo.insert(txn).unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();

        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.amount.cents(), 8543);
        assert_eq!(loaded.user_id, user);
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = temp_dir.path().join("transactions.json");
        std::fs::create_dir_all(path.join("blocker")).unwrap();
        let repo = TransactionRepository::new(path);

        assert!(repo.insert(expense(UserId::new(), 1, 100)).is_err());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_malformed_record_rejects_load() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(expense(UserId::new(), 3, 100)).unwrap();

        std::fs::write(
            temp_dir.path().join("transactions.json"),
            r#"{"records": [{"id": "x", "type": "expense"}]}"#,
        )
        .unwrap();

        let err = repo.load().unwrap_err();
        assert!(matches!(err, LedgerError::MalformedRecord { .. }));
        // previously loaded data survives the failed load
        assert_eq!(repo.count().unwrap(), 1);
    }
}
