//! Bank statement lines and match verdicts
//!
//! Both are ephemeral: they are built per upload and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::transaction::Transaction;

/// One row of an uploaded bank statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankStatementLine {
    pub date: NaiveDate,
    pub description: String,
    /// Signed amount; negative is money leaving the account
    pub amount: Money,
}

impl BankStatementLine {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Money) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
        }
    }
}

/// Whether a statement line was found in the user's records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for a single statement line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub bank_line: BankStatementLine,
    pub matched_transaction: Option<Transaction>,
    pub status: MatchStatus,
}

impl MatchResult {
    pub fn matched(bank_line: BankStatementLine, transaction: Transaction) -> Self {
        Self {
            bank_line,
            matched_transaction: Some(transaction),
            status: MatchStatus::Matched,
        }
    }

    pub fn unmatched(bank_line: BankStatementLine) -> Self {
        Self {
            bank_line,
            matched_transaction: None,
            status: MatchStatus::Unmatched,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.status == MatchStatus::Matched
    }
}
