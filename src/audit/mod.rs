//! Audit logging for pocket-ledger
//!
//! Every write to the stores, every exported report and every failed store
//! operation is recorded in an append-only JSON-lines file (`audit.log`).
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_ledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Transaction, txn.id.to_string(), &txn))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
