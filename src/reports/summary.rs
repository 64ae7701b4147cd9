//! Period report
//!
//! Totals, category breakdown and daily trend for the transactions that fall
//! inside a reporting period.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::error::LedgerResult;
use crate::models::{DateRange, Money, ReportPeriod, Transaction, UserId};
use crate::services::TransactionService;
use crate::storage::Storage;

/// Expense total for one category label
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
    /// Share of the period's expenses, 0-100
    pub percentage: f64,
}

/// Income and expenses on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub income: Money,
    pub expenses: Money,
}

/// Report for one period
#[derive(Debug, Clone)]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub range: DateRange,
    pub total_income: Money,
    pub total_expenses: Money,
    pub transaction_count: usize,
    /// Sorted by amount, largest first
    pub categories: Vec<CategoryTotal>,
    /// Ascending by date
    pub daily_trend: Vec<DailyTotal>,
    /// The transactions inside the range, in input order
    pub transactions: Vec<Transaction>,
}

impl PeriodReport {
    /// Build the report from a user's transactions as of `today`
    pub fn generate(transactions: &[Transaction], period: ReportPeriod, today: NaiveDate) -> Self {
        let range = period.date_range(today);
        let filtered: Vec<Transaction> = transactions
            .iter()
            .filter(|t| range.contains(t.date))
            .cloned()
            .collect();

        let mut total_income = Money::zero();
        let mut total_expenses = Money::zero();
        let mut by_category: HashMap<&str, Money> = HashMap::new();
        let mut by_day: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();

        for txn in &filtered {
            let day = by_day.entry(txn.date).or_insert(DailyTotal {
                date: txn.date,
                income: Money::zero(),
                expenses: Money::zero(),
            });

            if txn.is_income() {
                total_income += txn.amount;
                day.income += txn.amount;
            } else {
                total_expenses += txn.amount;
                day.expenses += txn.amount;
                *by_category.entry(txn.category.as_str()).or_default() += txn.amount;
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

        Self {
            period,
            range,
            total_income,
            total_expenses,
            transaction_count: filtered.len(),
            categories,
            daily_trend: by_day.into_values().collect(),
            transactions: filtered,
        }
    }

    /// Load a user's transactions and build the report
    pub fn for_user(
        storage: &Storage,
        user_id: UserId,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> LedgerResult<Self> {
        let transactions = TransactionService::new(storage).list(user_id)?;
        Ok(Self::generate(&transactions, period, today))
    }

    /// Income minus expenses
    pub fn net_balance(&self) -> Money {
        self.total_income - self.total_expenses
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Financial Report ({}): {}\n",
            self.period, self.range
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Total Income:      {:>14}\n", self.total_income));
        output.push_str(&format!("Total Expenses:    {:>14}\n", self.total_expenses));
        output.push_str(&format!("Net Balance:       {:>14}\n", self.net_balance()));
        output.push_str(&format!("Transactions:      {:>14}\n\n", self.transaction_count));

        if self.is_empty() {
            output.push_str("No data available for the selected period\n");
            return output;
        }

        output.push_str(&format!("{:<30} {:>14} {:>8}\n", "Category", "Amount", "%"));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if self.categories.is_empty() {
            output.push_str("No expenses in this period\n");
        }
        for category in &self.categories {
            output.push_str(&format!(
                "{:<30} {:>14} {:>7.1}%\n",
                category.category, category.amount, category.percentage
            ));
        }

        output.push_str(&format!(
            "\n{:<12} {:>14} {:>14}\n",
            "Date", "Income", "Expenses"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for day in &self.daily_trend {
            output.push_str(&format!(
                "{:<12} {:>14} {:>14}\n",
                day.date, day.income, day.expenses
            ));
        }

        output
    }
}

/// `part / whole * 100`, or 0 when `whole` is zero
pub fn percentage_of(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        part.cents() as f64 / whole.cents() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTransaction, TransactionType};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn txn(kind: TransactionType, cents: i64, category: &str, m: u32, d: u32) -> Transaction {
        Transaction::from_new(
            UserId::new(),
            NewTransaction::new(kind, Money::from_cents(cents), category, date(m, d)),
        )
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(TransactionType::Income, 350000, "Salary", 1, 16),
            txn(TransactionType::Expense, 8543, "Groceries", 1, 15),
            txn(TransactionType::Expense, 4520, "Transport", 1, 17),
            txn(TransactionType::Expense, 3215, "Groceries", 1, 18),
            txn(TransactionType::Expense, 9999, "Rent", 12, 31),
        ]
    }

    #[test]
    fn test_month_totals() {
        let report = PeriodReport::generate(&sample(), ReportPeriod::Month, date(1, 20));

        assert_eq!(report.transaction_count, 4);
        assert_eq!(report.total_income.cents(), 350000);
        assert_eq!(report.total_expenses.cents(), 16278);
        assert_eq!(report.net_balance().cents(), 350000 - 16278);
    }

    #[test]
    fn test_categories_sorted_descending() {
        let report = PeriodReport::generate(&sample(), ReportPeriod::Month, date(1, 20));

        let names: Vec<_> = report.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Transport"]);
        assert_eq!(report.categories[0].amount.cents(), 11758);

        let total: f64 = report.categories.iter().map(|c| c.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_trend_ascending() {
        let report = PeriodReport::generate(&sample(), ReportPeriod::Month, date(1, 20));

        let dates: Vec<_> = report.daily_trend.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(1, 15), date(1, 16), date(1, 17), date(1, 18)]);
        assert_eq!(report.daily_trend[1].income.cents(), 350000);
        assert!(report.daily_trend[1].expenses.is_zero());
    }

    #[test]
    fn test_range_is_inclusive() {
        let transactions = vec![
            txn(TransactionType::Expense, 100, "A", 1, 13),
            txn(TransactionType::Expense, 100, "A", 1, 20),
            txn(TransactionType::Expense, 100, "A", 1, 12),
        ];

        // week of 2024-01-20 starts on 2024-01-13
        let report = PeriodReport::generate(&transactions, ReportPeriod::Week, date(1, 20));
        assert_eq!(report.transaction_count, 2);
    }

    #[test]
    fn test_income_only_has_zero_percentages() {
        let transactions = vec![txn(TransactionType::Income, 5000, "Salary", 1, 2)];
        let report = PeriodReport::generate(&transactions, ReportPeriod::Year, date(1, 20));

        assert!(report.categories.is_empty());
        assert_eq!(percentage_of(Money::from_cents(10), Money::zero()), 0.0);
        assert!(report.format_terminal().contains("No expenses in this period"));
    }

    #[test]
    fn test_empty_period_message() {
        let report = PeriodReport::generate(&[], ReportPeriod::Quarter, date(5, 1));
        assert!(report.is_empty());
        assert!(report
            .format_terminal()
            .contains("No data available for the selected period"));
    }
}
