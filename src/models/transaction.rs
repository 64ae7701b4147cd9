//! Transaction model
//!
//! A transaction is a single income or expense event owned by a user. The
//! amount is always a non-negative magnitude; direction comes from
//! [`TransactionType`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{TransactionId, UserId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Title-case label for notifications
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(TransactionValidationError::UnknownType(other.to_string())),
        }
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Owner of the record
    pub user_id: UserId,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Non-negative magnitude
    pub amount: Money,

    /// Free-text category label
    pub category: String,

    #[serde(default)]
    pub description: String,

    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a stored transaction from user input
    pub fn from_new(user_id: UserId, input: NewTransaction) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            kind: input.kind,
            amount: input.amount,
            category: input.category.trim().to_string(),
            description: input.description.trim().to_string(),
            date: input.date,
            created_at: Utc::now(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with direction applied (expenses negative)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        validate_fields(self.amount, &self.category)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}] {}",
            self.date, self.kind, self.amount, self.category, self.description
        )
    }
}

/// User input for creating a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionType,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            description: String::new(),
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        validate_fields(self.amount, &self.category)
    }
}

fn validate_fields(amount: Money, category: &str) -> Result<(), TransactionValidationError> {
    if amount.is_negative() {
        return Err(TransactionValidationError::NegativeAmount(amount));
    }
    if category.trim().is_empty() {
        return Err(TransactionValidationError::MissingCategory);
    }
    Ok(())
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionValidationError {
    #[error("Amount must not be negative (got {0}); use the transaction type for direction")]
    NegativeAmount(Money),
    #[error("Category is required")]
    MissingCategory,
    #[error("Unknown transaction type '{0}', expected income or expense")]
    UnknownType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_new_trims_labels() {
        let input = NewTransaction::new(
            TransactionType::Expense,
            Money::from_cents(8543),
            "  Groceries ",
            date(2024, 1, 15),
        )
        .with_description(" weekly shop ");
        let txn = Transaction::from_new(UserId::new(), input);

        assert_eq!(txn.category, "Groceries");
        assert_eq!(txn.description, "weekly shop");
        assert!(txn.is_expense());
        assert_eq!(txn.signed_amount().cents(), -8543);
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let input = NewTransaction::new(
            TransactionType::Income,
            Money::from_cents(-100),
            "Salary",
            date(2024, 1, 16),
        );
        assert!(matches!(
            input.validate(),
            Err(TransactionValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_validate_requires_category() {
        let input = NewTransaction::new(
            TransactionType::Expense,
            Money::zero(),
            "   ",
            date(2024, 1, 16),
        );
        assert_eq!(
            input.validate(),
            Err(TransactionValidationError::MissingCategory)
        );
    }

    #[test]
    fn test_type_parse() {
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!(" expense ".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let txn = Transaction::from_new(
            UserId::new(),
            NewTransaction::new(
                TransactionType::Income,
                Money::from_cents(350000),
                "Salary",
                date(2024, 1, 16),
            ),
        );
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["amount"], 350000);
        assert_eq!(value["date"], "2024-01-16");
    }
}
