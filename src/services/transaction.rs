//! Transaction service
//!
//! Validates new income/expense records, persists them and writes the audit
//! trail. Listing is always scoped to one user.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{NewTransaction, Transaction, UserId};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new transaction for `user_id`
    pub fn add(&self, user_id: UserId, input: NewTransaction) -> LedgerResult<Transaction> {
        input
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let txn = Transaction::from_new(user_id, input);

        if let Err(e) = self.storage.transactions.insert(txn.clone()) {
            self.storage
                .log_failure(Some(user_id), EntityType::Transaction, txn.id.to_string(), &e);
            return Err(e);
        }

        self.storage
            .log_create(user_id, EntityType::Transaction, txn.id.to_string(), &txn);

        Ok(txn)
    }

    /// All of a user's transactions, newest date first
    pub fn list(&self, user_id: UserId) -> LedgerResult<Vec<Transaction>> {
        self.storage.transactions.list_for_user(user_id).map_err(|e| {
            self.storage
                .log_failure(Some(user_id), EntityType::Transaction, "list", &e);
            e
        })
    }

    /// The `limit` most recent transactions
    pub fn recent(&self, user_id: UserId, limit: usize) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = self.list(user_id)?;
        transactions.truncate(limit);
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Money, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn expense(cents: i64, category: &str, d: u32) -> NewTransaction {
        NewTransaction::new(TransactionType::Expense, Money::from_cents(cents), category, date(d))
    }

    #[test]
    fn test_add_and_list() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let user = UserId::new();

        service.add(user, expense(8543, "Groceries", 15)).unwrap();
        service.add(user, expense(4520, "Transport", 17)).unwrap();

        let list = service.list(user).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].date, date(17));
        assert_eq!(list[1].category, "Groceries");
    }

    #[test]
    fn test_add_writes_audit_entry() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let user = UserId::new();

        let txn = service.add(user, expense(1000, "Food", 1)).unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_id, txn.id.to_string());
    }

    #[test]
    fn test_add_succeeds_when_audit_log_unwritable() {
        let (_temp_dir, storage) = create_test_storage();
        std::fs::create_dir_all(storage.paths().audit_log()).unwrap();
        let service = TransactionService::new(&storage);
        let user = UserId::new();

        let txn = service.add(user, expense(2500, "Food", 4)).unwrap();

        assert_eq!(storage.transactions.count().unwrap(), 1);
        assert_eq!(service.list(user).unwrap()[0].id, txn.id);
    }

    #[test]
    fn test_negative_amount_rejected_without_state_change() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let user = UserId::new();

        let err = service.add(user, expense(-500, "Food", 1)).unwrap_err();
        assert!(err.is_user_input());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_empty_category_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service.add(UserId::new(), expense(500, "   ", 1)).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn test_recent_limits_results() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let user = UserId::new();
        for d in 1..=5 {
            service.add(user, expense(100, "Misc", d)).unwrap();
        }

        let recent = service.recent(user, 3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].date, date(5));
    }

    #[test]
    fn test_other_users_are_invisible() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let alice = UserId::new();

        service.add(alice, expense(100, "Misc", 1)).unwrap();
        assert!(service.list(UserId::new()).unwrap().is_empty());
    }
}
