//! Core data models for pocket-ledger
//!
//! Transactions, daily budgets, bank statement lines and report periods.

pub mod budget;
pub mod ids;
pub mod money;
pub mod period;
pub mod statement;
pub mod transaction;

pub use budget::{BudgetEntry, BudgetMap, BudgetStatus, NEAR_BUDGET_PERCENT};
pub use ids::{TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use period::{DateRange, ReportPeriod};
pub use statement::{BankStatementLine, MatchResult, MatchStatus};
pub use transaction::{NewTransaction, Transaction, TransactionType, TransactionValidationError};
