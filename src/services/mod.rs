//! Service layer for pocket-ledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit logging and cross-entity operations.

pub mod budget;
pub mod reconciliation;
pub mod statement;
pub mod transaction;

pub use budget::{classify_day, daily_expenses, BudgetService, DailyExpenses};
pub use reconciliation::{match_statement, MatchSummary, Reconciliation, ReconciliationService};
pub use statement::{parse_statement, validate_upload, ParsedStatement, RowError};
pub use transaction::TransactionService;
