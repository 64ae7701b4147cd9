//! Transaction CLI commands

use chrono::NaiveDate;
use clap::Args;

use crate::context::AppContext;
use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, NewTransaction, TransactionType};
use crate::notification::Notification;
use crate::services::TransactionService;

/// Arguments for `add`
#[derive(Args)]
pub struct AddArgs {
    /// income or expense
    pub kind: TransactionType,

    /// Amount (e.g. "85.43" or "$1,200")
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Category label
    #[arg(short, long)]
    pub category: String,

    /// Free-text description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Transaction date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

/// Arguments for `list`
#[derive(Args)]
pub struct ListArgs {
    /// Number of transactions to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

pub fn handle_add_command(ctx: &AppContext, args: AddArgs) -> LedgerResult<()> {
    let amount = parse_amount(&args.amount)?;
    let date = match args.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => ctx.today(),
    };

    let input = NewTransaction::new(args.kind, amount, args.category, date)
        .with_description(args.description);

    let txn = TransactionService::new(ctx.storage()).add(ctx.user_id(), input)?;

    println!("{}", Notification::transaction_added(&txn));
    println!();
    print!("{}", format_transaction_details(&txn));
    Ok(())
}

pub fn handle_list_command(ctx: &AppContext, args: ListArgs) -> LedgerResult<()> {
    let transactions = TransactionService::new(ctx.storage()).recent(ctx.user_id(), args.limit)?;
    print!("{}", format_transaction_table(&transactions));
    Ok(())
}

/// Parse a user-entered amount
pub(crate) fn parse_amount(s: &str) -> LedgerResult<Money> {
    Money::parse(s).map_err(|e| LedgerError::Validation(e.to_string()))
}

/// Parse a user-entered YYYY-MM-DD date
pub(crate) fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,200.50").unwrap().cents(), 120050);
        assert!(parse_amount("ten").unwrap_err().is_user_input());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("15/01/2024").is_err());
    }
}
