//! Transaction display formatting
//!
//! Tables for transaction lists and a detail view for a single record.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::Transaction;

/// Shown instead of an empty table
pub const NO_TRANSACTIONS: &str = "No transactions yet. Start by adding your first transaction!";

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(txn: &Transaction) -> Self {
        let sign = if txn.is_income() { '+' } else { '-' };
        Self {
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.kind.to_string(),
            category: truncate(&txn.category, 20),
            description: truncate(&txn.description, 30),
            amount: format!("{}{}", sign, txn.amount),
            id: txn.id.short(),
        }
    }
}

/// Format transactions as a table, newest first as given
pub fn format_transaction_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return format!("{}\n", NO_TRANSACTIONS);
    }

    let mut table = Table::new(transactions.iter().map(TransactionRow::from));
    table
        .with(Style::rounded())
        .modify(Columns::single(4), Alignment::right());

    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.kind.label()));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

/// Truncate a string to at most `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, NewTransaction, TransactionType, UserId};
    use chrono::NaiveDate;

    fn sample(kind: TransactionType) -> Transaction {
        Transaction::from_new(
            UserId::new(),
            NewTransaction::new(
                kind,
                Money::from_cents(8543),
                "Groceries",
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            )
            .with_description("Weekly shop"),
        )
    }

    #[test]
    fn test_empty_list_message() {
        assert!(format_transaction_table(&[]).contains(NO_TRANSACTIONS));
    }

    #[test]
    fn test_table_contains_rows() {
        let output = format_transaction_table(&[
            sample(TransactionType::Expense),
            sample(TransactionType::Income),
        ]);
        assert!(output.contains("Category"));
        assert!(output.contains("-$85.43"));
        assert!(output.contains("+$85.43"));
        assert!(output.contains("Weekly shop"));
    }

    #[test]
    fn test_details() {
        let output = format_transaction_details(&sample(TransactionType::Expense));
        assert!(output.contains("Type:        Expense"));
        assert!(output.contains("Description: Weekly shop"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }
}
