//! Dashboard summary
//!
//! All-time totals plus a short-horizon view of recent spending, today's
//! budget and the monthly trend.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::LedgerResult;
use crate::models::{BudgetMap, Money, Transaction, UserId};
use crate::services::{BudgetService, TransactionService};
use crate::storage::Storage;

use super::summary::{percentage_of, CategoryTotal};

/// Months shown in the trend
pub const TREND_MONTHS: usize = 6;

/// Transactions shown in the recent list
pub const RECENT_LIMIT: usize = 10;

/// Today's spending against today's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodayStatus {
    NoBudget,
    Under,
    Over,
}

impl TodayStatus {
    fn from_amounts(spent: Money, budget: Money) -> Self {
        if !budget.is_positive() {
            Self::NoBudget
        } else if spent > budget {
            Self::Over
        } else {
            Self::Under
        }
    }
}

/// Income and expenses for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    pub income: Money,
    pub expenses: Money,
}

impl MonthTotal {
    /// Short label such as `Jan 2024`
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month))
    }
}

/// Dashboard figures for one user
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub total_income: Money,
    pub total_expenses: Money,
    pub today_expenses: Money,
    /// Expenses dated within the last seven days or later
    pub week_expenses: Money,
    /// Expenses dated on or after the first of this month
    pub month_expenses: Money,
    pub today_budget: Money,
    pub today_status: TodayStatus,
    /// All-time expense totals, largest first
    pub categories: Vec<CategoryTotal>,
    /// Up to the last six months with activity, oldest first
    pub monthly_trend: Vec<MonthTotal>,
    /// Newest first
    pub recent: Vec<Transaction>,
}

impl Dashboard {
    pub fn generate(transactions: &[Transaction], budgets: &BudgetMap, today: NaiveDate) -> Self {
        let week_start = today - Duration::days(7);
        let month_start = today.with_day(1).unwrap_or(today);

        let mut total_income = Money::zero();
        let mut total_expenses = Money::zero();
        let mut today_expenses = Money::zero();
        let mut week_expenses = Money::zero();
        let mut month_expenses = Money::zero();
        let mut by_category: HashMap<&str, Money> = HashMap::new();
        let mut by_month: BTreeMap<(i32, u32), MonthTotal> = BTreeMap::new();

        for txn in transactions {
            let month = by_month
                .entry((txn.date.year(), txn.date.month()))
                .or_insert(MonthTotal {
                    year: txn.date.year(),
                    month: txn.date.month(),
                    income: Money::zero(),
                    expenses: Money::zero(),
                });

            if txn.is_income() {
                total_income += txn.amount;
                month.income += txn.amount;
                continue;
            }

            total_expenses += txn.amount;
            month.expenses += txn.amount;
            *by_category.entry(txn.category.as_str()).or_default() += txn.amount;

            if txn.date == today {
                today_expenses += txn.amount;
            }
            if txn.date >= week_start {
                week_expenses += txn.amount;
            }
            if txn.date >= month_start {
                month_expenses += txn.amount;
            }
        }

        let mut categories: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
                percentage: percentage_of(amount, total_expenses),
            })
            .collect();
        categories.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });

        let mut monthly_trend: Vec<MonthTotal> = by_month.into_values().collect();
        let skip = monthly_trend.len().saturating_sub(TREND_MONTHS);
        monthly_trend.drain(..skip);

        let mut recent = transactions.to_vec();
        recent.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        recent.truncate(RECENT_LIMIT);

        let today_budget = budgets.get(&today).copied().unwrap_or_default();

        Self {
            today,
            total_income,
            total_expenses,
            today_expenses,
            week_expenses,
            month_expenses,
            today_budget,
            today_status: TodayStatus::from_amounts(today_expenses, today_budget),
            categories,
            monthly_trend,
            recent,
        }
    }

    pub fn for_user(storage: &Storage, user_id: UserId, today: NaiveDate) -> LedgerResult<Self> {
        let transactions = TransactionService::new(storage).list(user_id)?;
        let budgets = BudgetService::new(storage).budgets(user_id)?;
        Ok(Self::generate(&transactions, &budgets, today))
    }

    pub fn balance(&self) -> Money {
        self.total_income - self.total_expenses
    }

    /// Format the dashboard for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Dashboard ({})\n", self.today));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Balance:           {:>14}\n", self.balance()));
        output.push_str(&format!("Total Income:      {:>14}\n", self.total_income));
        output.push_str(&format!("Total Expenses:    {:>14}\n", self.total_expenses));
        output.push('\n');

        let budget_note = match self.today_status {
            TodayStatus::NoBudget => "no budget set".to_string(),
            TodayStatus::Under => format!("budget {}", self.today_budget),
            TodayStatus::Over => format!("budget {} - over budget!", self.today_budget),
        };
        output.push_str(&format!(
            "Today's Expenses:  {:>14}  ({})\n",
            self.today_expenses, budget_note
        ));
        output.push_str(&format!("Week Expenses:     {:>14}\n", self.week_expenses));
        output.push_str(&format!("Month Expenses:    {:>14}\n", self.month_expenses));

        output.push_str("\nExpenses by Category\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if self.categories.is_empty() {
            output.push_str("No expense data available\n");
        }
        for category in &self.categories {
            output.push_str(&format!(
                "{:<30} {:>14} {:>7.0}%\n",
                category.category, category.amount, category.percentage
            ));
        }

        output.push_str("\nMonthly Trend\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if self.monthly_trend.is_empty() {
            output.push_str("No monthly data available\n");
        }
        for month in &self.monthly_trend {
            output.push_str(&format!(
                "{:<12} income {:>12}  expenses {:>12}\n",
                month.label(),
                month.income,
                month.expenses
            ));
        }

        output
    }
}
