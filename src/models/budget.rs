//! Daily budget model
//!
//! A budget entry is a spending ceiling for one calendar date. Each user has
//! at most one entry per date.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;
use super::money::Money;

/// Spend above this share of the budget counts as "near budget"
pub const NEAR_BUDGET_PERCENT: i64 = 80;

/// A daily budget for one user and date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub user_id: UserId,
    pub date: NaiveDate,
    /// Non-negative ceiling for the day
    pub amount: Money,
    pub updated_at: DateTime<Utc>,
}

impl BudgetEntry {
    pub fn new(user_id: UserId, date: NaiveDate, amount: Money) -> Self {
        Self {
            user_id,
            date,
            amount,
            updated_at: Utc::now(),
        }
    }
}

/// Date -> budget lookup for one user
pub type BudgetMap = BTreeMap<NaiveDate, Money>;

/// Status of a day's spending against its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    NoBudget,
    OverBudget,
    NearBudget,
    UnderBudget,
}

impl BudgetStatus {
    /// Classify a day's spending. Rules are checked in order:
    /// no budget, over, above 80%, otherwise under.
    pub fn classify(daily_expense: Money, daily_budget: Money) -> Self {
        if daily_budget.is_zero() {
            Self::NoBudget
        } else if daily_expense > daily_budget {
            Self::OverBudget
        } else if i128::from(daily_expense.cents()) * 100
            > i128::from(daily_budget.cents()) * i128::from(NEAR_BUDGET_PERCENT)
        {
            Self::NearBudget
        } else {
            Self::UnderBudget
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoBudget => "no-budget",
            Self::OverBudget => "over-budget",
            Self::NearBudget => "near-budget",
            Self::UnderBudget => "under-budget",
        }
    }

    /// One-character marker for calendar cells
    pub fn marker(&self) -> char {
        match self {
            Self::NoBudget => ' ',
            Self::OverBudget => '!',
            Self::NearBudget => '~',
            Self::UnderBudget => '+',
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(d: i64) -> Money {
        Money::from_cents(d * 100)
    }

    #[test]
    fn test_no_budget_when_budget_zero() {
        assert_eq!(
            BudgetStatus::classify(Money::zero(), Money::zero()),
            BudgetStatus::NoBudget
        );
        assert_eq!(
            BudgetStatus::classify(dollars(500), Money::zero()),
            BudgetStatus::NoBudget
        );
    }

    #[test]
    fn test_classification_examples() {
        assert_eq!(BudgetStatus::classify(dollars(81), dollars(100)), BudgetStatus::NearBudget);
        assert_eq!(BudgetStatus::classify(dollars(101), dollars(100)), BudgetStatus::OverBudget);
        assert_eq!(BudgetStatus::classify(dollars(50), dollars(100)), BudgetStatus::UnderBudget);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // exactly 80% is still under, exactly 100% is near
        assert_eq!(BudgetStatus::classify(dollars(80), dollars(100)), BudgetStatus::UnderBudget);
        assert_eq!(BudgetStatus::classify(dollars(100), dollars(100)), BudgetStatus::NearBudget);
        assert_eq!(
            BudgetStatus::classify(Money::from_cents(8001), dollars(100)),
            BudgetStatus::NearBudget
        );
    }

    #[test]
    fn test_classify_large_amounts() {
        let budget = Money::from_cents(100_000_000_000_000_000);
        assert_eq!(BudgetStatus::classify(budget, budget), BudgetStatus::NearBudget);
        assert_eq!(
            BudgetStatus::classify(Money::from_cents(80_000_000_000_000_000), budget),
            BudgetStatus::UnderBudget
        );
        assert_eq!(
            BudgetStatus::classify(Money::from_cents(i64::MAX), Money::from_cents(i64::MAX)),
            BudgetStatus::NearBudget
        );
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&BudgetStatus::OverBudget).unwrap(),
            "\"over-budget\""
        );
        assert_eq!(BudgetStatus::NoBudget.to_string(), "no-budget");
    }
}
