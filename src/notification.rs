//! User-facing notifications
//!
//! Every user action ends in one short notification: a success message, or
//! a failure message that hides backend detail. Callers decide how to render
//! them.

use std::fmt;

use crate::error::LedgerError;
use crate::models::{BudgetEntry, ReportPeriod, Transaction};
use crate::services::MatchSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// The user action a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddTransaction,
    LoadTransactions,
    UpdateBudget,
    LoadBudgets,
    ProcessStatement,
    ExportReport,
}

impl Action {
    /// Generic message shown when the backend fails
    fn failure_message(&self) -> &'static str {
        match self {
            Self::AddTransaction => "Failed to add transaction",
            Self::LoadTransactions => "Failed to fetch transactions",
            Self::UpdateBudget => "Failed to update budget",
            Self::LoadBudgets => "Failed to fetch budgets",
            Self::ProcessStatement => "Failed to process bank statement",
            Self::ExportReport => "Failed to export report",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn transaction_added(txn: &Transaction) -> Self {
        Self::new(
            NotificationKind::Success,
            "Transaction Added",
            format!("{} of {} added successfully.", txn.kind.label(), txn.amount),
        )
    }

    pub fn budget_updated(entry: &BudgetEntry) -> Self {
        Self::new(
            NotificationKind::Success,
            "Budget Updated",
            format!("Daily budget for {} set to {}", entry.date, entry.amount),
        )
    }

    pub fn statement_processed(summary: &MatchSummary) -> Self {
        Self::new(NotificationKind::Success, "Statement Processed", summary.to_string())
    }

    pub fn comparison_downloaded() -> Self {
        Self::new(
            NotificationKind::Success,
            "Report Downloaded",
            "Bank statement comparison report has been downloaded.",
        )
    }

    pub fn report_downloaded(kind: &str, period: ReportPeriod) -> Self {
        Self::new(
            NotificationKind::Success,
            "Report Downloaded",
            format!("{} report for {} has been downloaded.", kind, period),
        )
    }

    /// Turn an error into a notification. Input errors keep their detail;
    /// backend errors collapse to the action's generic message.
    pub fn failure(action: Action, error: &LedgerError) -> Self {
        match error {
            LedgerError::InvalidFileType { .. } => Self::new(
                NotificationKind::Error,
                "Invalid File Type",
                "Please upload a CSV file.",
            ),
            LedgerError::Validation(message) => {
                Self::new(NotificationKind::Error, "Invalid Input", message.clone())
            }
            LedgerError::Import(message) => {
                Self::new(NotificationKind::Error, "Unreadable Statement", message.clone())
            }
            _ => Self::new(NotificationKind::Error, "Error", action.failure_message()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, NewTransaction, TransactionType, UserId};
    use chrono::NaiveDate;

    #[test]
    fn test_transaction_added_message() {
        let txn = Transaction::from_new(
            UserId::new(),
            NewTransaction::new(
                TransactionType::Income,
                Money::from_cents(350000),
                "Salary",
                NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            ),
        );
        let note = Notification::transaction_added(&txn);
        assert_eq!(note.to_string(), "Transaction Added: Income of $3500.00 added successfully.");
        assert!(!note.is_error());
    }

    #[test]
    fn test_backend_failure_is_generic() {
        let note = Notification::failure(
            Action::AddTransaction,
            &LedgerError::Storage("permission denied at /secret/path".into()),
        );
        assert!(note.is_error());
        assert_eq!(note.message, "Failed to add transaction");
    }

    #[test]
    fn test_input_failures_keep_detail() {
        let note = Notification::failure(
            Action::ProcessStatement,
            &LedgerError::InvalidFileType {
                file_name: "a.pdf".into(),
            },
        );
        assert_eq!(note.title, "Invalid File Type");
        assert_eq!(note.message, "Please upload a CSV file.");

        let note = Notification::failure(
            Action::UpdateBudget,
            &LedgerError::Validation("Budget must not be negative".into()),
        );
        assert_eq!(note.message, "Budget must not be negative");
    }

    #[test]
    fn test_statement_processed() {
        let note = Notification::statement_processed(&MatchSummary {
            matched: 3,
            unmatched: 1,
        });
        assert_eq!(note.message, "3 matched, 1 unmatched transactions found.");
    }
}
