//! Budget CLI commands
//!
//! Daily budgets: set a date's budget, inspect one date, or show the month
//! calendar.

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;

use crate::context::AppContext;
use crate::error::{LedgerError, LedgerResult};
use crate::notification::Notification;
use crate::reports::BudgetCalendar;
use crate::services::BudgetService;

use super::transaction::{parse_amount, parse_date};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the budget for a date
    Set {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Amount (e.g. "50" or "50.00")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show budget, spending and status for a date
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        date: Option<String>,
    },

    /// Show the month calendar
    Calendar {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(ctx: &AppContext, cmd: BudgetCommands) -> LedgerResult<()> {
    match cmd {
        BudgetCommands::Set { date, amount } => {
            let date = parse_date(&date)?;
            let amount = parse_amount(&amount)?;

            let entry = BudgetService::new(ctx.storage()).set_budget(ctx.user_id(), date, amount)?;
            println!("{}", Notification::budget_updated(&entry));
        }

        BudgetCommands::Show { date } => {
            let date = match date.as_deref() {
                Some(s) => parse_date(s)?,
                None => ctx.today(),
            };

            let calendar = BudgetCalendar::for_user(
                ctx.storage(),
                ctx.user_id(),
                date.year(),
                date.month(),
                ctx.today(),
            )?;
            let day = calendar
                .day(date)
                .ok_or_else(|| LedgerError::budget_not_found(date.to_string()))?;
            print!("{}", BudgetCalendar::format_day(day));
        }

        BudgetCommands::Calendar { month } => {
            let (year, month) = match month.as_deref() {
                Some(s) => parse_month(s)?,
                None => {
                    let today = ctx.today();
                    (today.year(), today.month())
                }
            };

            let calendar =
                BudgetCalendar::for_user(ctx.storage(), ctx.user_id(), year, month, ctx.today())?;
            print!("{}", calendar.format_terminal());
        }
    }

    Ok(())
}

/// Parse a YYYY-MM month
fn parse_month(s: &str) -> LedgerResult<(i32, u32)> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map(|d| (d.year(), d.month()))
        .map_err(|_| LedgerError::Validation(format!("Invalid month '{}', expected YYYY-MM", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-02").unwrap(), (2024, 2));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("Feb").is_err());
    }
}
