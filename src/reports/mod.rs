//! Reports module for pocket-ledger
//!
//! Provides the dashboard summary, period reports with category breakdown
//! and daily trend, and the monthly budget calendar.

pub mod calendar;
pub mod dashboard;
pub mod summary;

pub use calendar::{BudgetCalendar, CalendarDay};
pub use dashboard::{Dashboard, MonthTotal, TodayStatus};
pub use summary::{CategoryTotal, DailyTotal, PeriodReport};
