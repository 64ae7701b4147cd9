//! Bank statement reconciliation
//!
//! Compares the lines of an uploaded statement against the user's recorded
//! transactions. A line matches the first transaction on the same date whose
//! amount equals the line's absolute amount to within one cent. Matched
//! transactions stay in the candidate pool, so one transaction can match
//! several lines.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BankStatementLine, MatchResult, Transaction, UserId};
use crate::storage::Storage;

use super::statement::{parse_statement, validate_upload, RowError};
use super::TransactionService;

/// Amounts closer than this many cents are the same amount
pub const MATCH_TOLERANCE_CENTS: i64 = 1;

/// Match every statement line against `transactions`, in line order
pub fn match_statement(
    bank_lines: &[BankStatementLine],
    transactions: &[Transaction],
) -> Vec<MatchResult> {
    bank_lines
        .iter()
        .map(|line| match find_match(line, transactions) {
            Some(txn) => MatchResult::matched(line.clone(), txn.clone()),
            None => MatchResult::unmatched(line.clone()),
        })
        .collect()
}

fn find_match<'t>(line: &BankStatementLine, transactions: &'t [Transaction]) -> Option<&'t Transaction> {
    let magnitude = line.amount.abs();
    transactions.iter().find(|txn| {
        txn.date == line.date && (magnitude - txn.amount).abs().cents() < MATCH_TOLERANCE_CENTS
    })
}

/// Matched/unmatched counts for a set of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchSummary {
    pub matched: usize,
    pub unmatched: usize,
}

impl MatchSummary {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let matched = results.iter().filter(|r| r.is_matched()).count();
        Self {
            matched,
            unmatched: results.len() - matched,
        }
    }

    pub fn total(&self) -> usize {
        self.matched + self.unmatched
    }
}

impl std::fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} matched, {} unmatched transactions found.",
            self.matched, self.unmatched
        )
    }
}

/// Outcome of reconciling one statement upload
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub file_name: String,
    pub results: Vec<MatchResult>,
    /// Rows that could not be parsed and were skipped
    pub skipped_rows: Vec<RowError>,
}

impl Reconciliation {
    pub fn summary(&self) -> MatchSummary {
        MatchSummary::from_results(&self.results)
    }
}

/// Service for reconciling statements against stored transactions
pub struct ReconciliationService<'a> {
    storage: &'a Storage,
}

impl<'a> ReconciliationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Reconcile a statement file on disk
    pub fn reconcile_file(
        &self,
        user_id: UserId,
        path: &Path,
        content_type: Option<&str>,
    ) -> LedgerResult<Reconciliation> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        validate_upload(&file_name, content_type)?;

        let file = File::open(path).map_err(|e| {
            LedgerError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;

        self.reconcile_reader(user_id, &file_name, content_type, file)
    }

    /// Reconcile statement content from any reader. The file type check runs
    /// before anything is read.
    pub fn reconcile_reader<R: Read>(
        &self,
        user_id: UserId,
        file_name: &str,
        content_type: Option<&str>,
        reader: R,
    ) -> LedgerResult<Reconciliation> {
        validate_upload(file_name, content_type)?;

        let parsed = parse_statement(reader).map_err(|e| {
            self.storage
                .log_failure(Some(user_id), EntityType::Statement, file_name, &e);
            e
        })?;

        let transactions = TransactionService::new(self.storage).list(user_id)?;
        let results = match_statement(&parsed.lines, &transactions);

        Ok(Reconciliation {
            file_name: file_name.to_string(),
            results,
            skipped_rows: parsed.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{MatchStatus, Money, NewTransaction, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn txn(kind: TransactionType, cents: i64, d: u32, category: &str) -> Transaction {
        Transaction::from_new(
            UserId::new(),
            NewTransaction::new(kind, Money::from_cents(cents), category, date(d)),
        )
    }

    fn line(d: u32, cents: i64) -> BankStatementLine {
        BankStatementLine::new(date(d), "LINE", Money::from_cents(cents))
    }

    #[test]
    fn test_exact_amount_matches() {
        let transactions = vec![txn(TransactionType::Expense, 8543, 15, "Groceries")];

        let results = match_statement(&[line(15, -8543)], &transactions);
        assert_eq!(results[0].status, MatchStatus::Matched);
        assert_eq!(results[0].matched_transaction.as_ref().unwrap().category, "Groceries");
    }

    #[test]
    fn test_one_cent_difference_is_unmatched() {
        let transactions = vec![txn(TransactionType::Expense, 8543, 15, "Groceries")];

        let results = match_statement(&[line(15, -8544), line(15, -8542)], &transactions);
        assert!(results.iter().all(|r| r.status == MatchStatus::Unmatched));
        assert!(results[0].matched_transaction.is_none());
    }

    #[test]
    fn test_date_must_match() {
        let transactions = vec![txn(TransactionType::Expense, 4520, 17, "Gas")];

        let results = match_statement(&[line(18, -4520)], &transactions);
        assert!(!results[0].is_matched());
    }

    #[test]
    fn test_income_matches_positive_line() {
        let transactions = vec![txn(TransactionType::Income, 350000, 16, "Salary")];

        let results = match_statement(&[line(16, 350000)], &transactions);
        assert!(results[0].is_matched());
    }

    #[test]
    fn test_first_transaction_wins() {
        let first = txn(TransactionType::Expense, 1000, 1, "First");
        let second = txn(TransactionType::Expense, 1000, 1, "Second");

        let results = match_statement(&[line(1, -1000)], &[first, second]);
        assert_eq!(results[0].matched_transaction.as_ref().unwrap().category, "First");
    }

    #[test]
    fn test_one_transaction_can_match_many_lines() {
        let only = txn(TransactionType::Expense, 1000, 1, "Coffee");

        let results = match_statement(&[line(1, -1000), line(1, -1000)], &[only.clone()]);
        assert!(results.iter().all(|r| r.is_matched()));
        assert_eq!(results[1].matched_transaction.as_ref().unwrap().id, only.id);
    }

    #[test]
    fn test_output_preserves_line_order() {
        let lines = vec![line(3, -1), line(1, -2), line(2, -3)];
        let results = match_statement(&lines, &[]);
        let dates: Vec<_> = results.iter().map(|r| r.bank_line.date).collect();
        assert_eq!(dates, vec![date(3), date(1), date(2)]);
    }

    #[test]
    fn test_summary_counts() {
        let transactions = vec![txn(TransactionType::Expense, 8543, 15, "Groceries")];
        let results = match_statement(&[line(15, -8543), line(16, -100)], &transactions);

        let summary = MatchSummary::from_results(&results);
        assert_eq!(summary, MatchSummary { matched: 1, unmatched: 1 });
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.to_string(), "1 matched, 1 unmatched transactions found.");
    }

    #[test]
    fn test_service_reconciles_against_user_transactions() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();
        let user = UserId::new();

        TransactionService::new(&storage)
            .add(
                user,
                NewTransaction::new(
                    TransactionType::Expense,
                    Money::from_cents(8543),
                    "Groceries",
                    date(15),
                ),
            )
            .unwrap();

        let data = "Date,Description,Amount\n2024-01-15,GROCERY STORE,-85.43\n2024-01-16,SALARY,3500.00\nbad,row,1\n";
        let service = ReconciliationService::new(&storage);
        let reconciliation = service
            .reconcile_reader(user, "statement.csv", None, data.as_bytes())
            .unwrap();

        assert_eq!(reconciliation.summary(), MatchSummary { matched: 1, unmatched: 1 });
        assert_eq!(reconciliation.skipped_rows.len(), 1);
    }

    #[test]
    fn test_service_rejects_non_csv_before_reading() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let err = ReconciliationService::new(&storage)
            .reconcile_reader(UserId::new(), "statement.xlsx", None, "garbage".as_bytes())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidFileType { .. }));
    }
}
