//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod reconcile;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use reconcile::{handle_reconcile_command, ReconcileArgs};
pub use report::{handle_dashboard_command, handle_report_command, ReportArgs};
pub use transaction::{handle_add_command, handle_list_command, AddArgs, ListArgs};
