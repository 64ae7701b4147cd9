//! Monthly budget calendar
//!
//! A six-week grid starting on the Sunday on or before the first of the
//! month. Each cell carries the day's budget, spending and status.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetMap, BudgetStatus, Money, Transaction, UserId};
use crate::services::{classify_day, daily_expenses, BudgetService, DailyExpenses, TransactionService};
use crate::storage::Storage;

/// Cells in the grid (6 weeks x 7 days)
pub const GRID_DAYS: usize = 42;

/// One cell of the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days of neighbouring months
    pub in_month: bool,
    pub is_today: bool,
    pub budget: Money,
    pub spent: Money,
    pub status: BudgetStatus,
}

impl CalendarDay {
    /// Budget minus spending; negative when over budget
    pub fn remaining(&self) -> Money {
        self.budget - self.spent
    }
}

/// Budget calendar for one month
#[derive(Debug, Clone)]
pub struct BudgetCalendar {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl BudgetCalendar {
    pub fn generate(
        year: i32,
        month: u32,
        transactions: &[Transaction],
        budgets: &BudgetMap,
        today: NaiveDate,
    ) -> LedgerResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            LedgerError::Validation(format!("Invalid month: {}-{:02}", year, month))
        })?;
        let grid_start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));

        let expenses = daily_expenses(transactions);
        let days = grid_start
            .iter_days()
            .take(GRID_DAYS)
            .map(|date| build_day(date, month, today, &expenses, budgets))
            .collect();

        Ok(Self { year, month, days })
    }

    pub fn for_user(
        storage: &Storage,
        user_id: UserId,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> LedgerResult<Self> {
        let transactions = TransactionService::new(storage).list(user_id)?;
        let budgets = BudgetService::new(storage).budgets(user_id)?;
        Self::generate(year, month, &transactions, &budgets, today)
    }

    /// Look up a date shown in the grid
    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Month heading such as `January 2024`
    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    /// Format the grid for terminal display. Each cell shows the day number
    /// and a status marker; days outside the month are dimmed with dots.
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{:^49}\n", self.title()));
        for name in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
            output.push_str(&format!(" {:^5} ", name));
        }
        output.push('\n');

        for week in self.days.chunks(7) {
            for day in week {
                if day.in_month {
                    let today_mark = if day.is_today { '*' } else { ' ' };
                    output.push_str(&format!(
                        " {}{:>2} {} ",
                        today_mark,
                        day.date.day(),
                        day.status.marker()
                    ));
                } else {
                    output.push_str("  ..   ");
                }
            }
            output.push('\n');
        }

        output.push_str("\n! over budget  ~ near budget  + under budget  * today\n");
        output
    }

    /// Detail lines for one date
    pub fn format_day(day: &CalendarDay) -> String {
        format!(
            "{}\n  Budget:    {:>12}\n  Spent:     {:>12}\n  Remaining: {:>12}\n  Status:    {:>12}\n",
            day.date,
            day.budget,
            day.spent,
            day.remaining(),
            day.status
        )
    }
}

fn build_day(
    date: NaiveDate,
    month: u32,
    today: NaiveDate,
    expenses: &DailyExpenses,
    budgets: &BudgetMap,
) -> CalendarDay {
    CalendarDay {
        date,
        in_month: date.month() == month,
        is_today: date == today,
        budget: budgets.get(&date).copied().unwrap_or_default(),
        spent: expenses.get(&date).copied().unwrap_or_default(),
        status: classify_day(date, expenses, budgets),
    }
}
