//! Reconciliation result display

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::MatchResult;
use crate::services::{MatchSummary, RowError};

use super::transaction::truncate;

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Bank Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Your Record")]
    record: String,
}

impl From<&MatchResult> for MatchRow {
    fn from(result: &MatchResult) -> Self {
        let record = match &result.matched_transaction {
            Some(txn) if txn.description.is_empty() => format!("{} [{}]", txn.amount, txn.category),
            Some(txn) => format!("{} - {}", txn.amount, truncate(&txn.description, 25)),
            None => "Not found".to_string(),
        };
        let status = if result.is_matched() { "✓ matched" } else { "✗ unmatched" };

        Self {
            date: result.bank_line.date.to_string(),
            description: truncate(&result.bank_line.description, 30),
            amount: result.bank_line.amount.to_string(),
            status: status.to_string(),
            record,
        }
    }
}

/// Format match results with a summary line and any skipped rows
pub fn format_match_results(results: &[MatchResult], skipped: &[RowError]) -> String {
    let mut output = String::new();

    if results.is_empty() {
        output.push_str("No statement lines found.\n");
    } else {
        let mut table = Table::new(results.iter().map(MatchRow::from));
        table.with(Style::rounded());
        output.push_str(&format!("{}\n", table));
    }

    output.push_str(&format!("{}\n", MatchSummary::from_results(results)));

    if !skipped.is_empty() {
        output.push_str(&format!("\nSkipped {} unreadable row(s):\n", skipped.len()));
        for error in skipped {
            output.push_str(&format!("  {}\n", error));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BankStatementLine, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_format_results_and_skipped_rows() {
        let line = BankStatementLine::new(
            NaiveDate::from_ymd_opt(2024, 1, 18).unwrap(),
            "RESTAURANT",
            Money::from_cents(-3215),
        );
        let skipped = vec![RowError {
            line: 4,
            message: "Could not parse date: 'x'".into(),
        }];

        let output = format_match_results(&[MatchResult::unmatched(line)], &skipped);
        assert!(output.contains("RESTAURANT"));
        assert!(output.contains("Not found"));
        assert!(output.contains("0 matched, 1 unmatched transactions found."));
        assert!(output.contains("line 4: Could not parse date"));
    }

    #[test]
    fn test_empty_statement() {
        let output = format_match_results(&[], &[]);
        assert!(output.contains("No statement lines found."));
    }
}
