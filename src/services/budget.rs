//! Daily budget service
//!
//! Sets per-date budgets and classifies each day's spending against them.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetEntry, BudgetMap, BudgetStatus, Money, Transaction, UserId};
use crate::storage::Storage;

/// Expense totals per date
pub type DailyExpenses = BTreeMap<NaiveDate, Money>;

/// Service for daily budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the budget for a date, replacing any previous value
    pub fn set_budget(
        &self,
        user_id: UserId,
        date: NaiveDate,
        amount: Money,
    ) -> LedgerResult<BudgetEntry> {
        if amount.is_negative() {
            return Err(LedgerError::Validation(format!(
                "Budget must not be negative (got {})",
                amount
            )));
        }

        let entry = BudgetEntry::new(user_id, date, amount);
        let previous = match self.storage.budgets.upsert(entry.clone()) {
            Ok(previous) => previous,
            Err(e) => {
                self.storage
                    .log_failure(Some(user_id), EntityType::Budget, date.to_string(), &e);
                return Err(e);
            }
        };

        match previous {
            Some(before) => self.storage.log_update(
                user_id,
                EntityType::Budget,
                date.to_string(),
                &before,
                &entry,
            ),
            None => self
                .storage
                .log_create(user_id, EntityType::Budget, date.to_string(), &entry),
        }

        Ok(entry)
    }

    /// Budget for a date; zero when none is set
    pub fn get(&self, user_id: UserId, date: NaiveDate) -> LedgerResult<Money> {
        Ok(self
            .storage
            .budgets
            .get(user_id, date)?
            .map(|e| e.amount)
            .unwrap_or_default())
    }

    /// All of a user's budgets keyed by date
    pub fn budgets(&self, user_id: UserId) -> LedgerResult<BudgetMap> {
        self.storage.budgets.map_for_user(user_id).map_err(|e| {
            self.storage
                .log_failure(Some(user_id), EntityType::Budget, "list", &e);
            e
        })
    }
}

/// Sum expense amounts per date; income is ignored
pub fn daily_expenses(transactions: &[Transaction]) -> DailyExpenses {
    let mut totals = DailyExpenses::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        *totals.entry(txn.date).or_default() += txn.amount;
    }
    totals
}

/// Classify one date, treating missing entries as zero
pub fn classify_day(date: NaiveDate, expenses: &DailyExpenses, budgets: &BudgetMap) -> BudgetStatus {
    let spent = expenses.get(&date).copied().unwrap_or_default();
    let budget = budgets.get(&date).copied().unwrap_or_default();
    BudgetStatus::classify(spent, budget)
}
