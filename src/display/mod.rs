//! Display formatting for terminal output
//!
//! Tables for transaction lists and reconciliation results. Reports format
//! themselves via their own `format_terminal` methods.

pub mod statement;
pub mod transaction;

pub use statement::format_match_results;
pub use transaction::{format_transaction_details, format_transaction_table, NO_TRANSACTIONS};
