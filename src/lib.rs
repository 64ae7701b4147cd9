//! pocket-ledger - personal income and expense tracker
//!
//! This library records income and expense transactions, keeps a daily
//! budget per calendar date, reconciles uploaded bank statements against the
//! recorded transactions and produces period reports with CSV export.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, budgets, statement lines, money)
//! - `storage`: JSON collections with validated loading and atomic writes
//! - `audit`: Append-only audit log of writes and failures
//! - `services`: Business logic (transactions, budgets, statement matching)
//! - `reports`: Dashboard, period report and budget calendar
//! - `export`: CSV exporters
//! - `display`: Terminal tables
//! - `notification`: User-facing success and failure messages
//! - `context`: The per-process application context
//! - `cli`: Command handlers for the `pocket` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_ledger::context::AppContext;
//! use pocket_ledger::services::TransactionService;
//!
//! let ctx = AppContext::from_env()?;
//! let recent = TransactionService::new(ctx.storage()).recent(ctx.user_id(), 10)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod notification;
pub mod reports;
pub mod services;
pub mod storage;

pub use context::AppContext;
pub use error::{LedgerError, LedgerResult};
