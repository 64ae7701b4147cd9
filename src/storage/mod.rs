//! Storage layer for pocket-ledger
//!
//! JSON collections with atomic writes and record validation on load.
//! Both collections hold the records of every user; callers pass the user
//! whose records they want.

pub mod budgets;
pub mod file_io;
pub mod records;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::UserId;

/// Owns the repositories and the audit log for one data directory
pub struct Storage {
    paths: LedgerPaths,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load both collections from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.transactions.load()?;
        self.budgets.load()?;
        Ok(())
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a committed create. The store write has already succeeded, so
    /// an audit write failure is not reported to the caller.
    pub fn log_create<T: Serialize>(
        &self,
        user_id: UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) {
        let _ = self
            .audit
            .log(&AuditEntry::create(entity_type, entity_id, entity).for_user(user_id));
    }

    pub fn log_update<T: Serialize>(
        &self,
        user_id: UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) {
        let _ = self
            .audit
            .log(&AuditEntry::update(entity_type, entity_id, before, after).for_user(user_id));
    }

    pub fn log_export(
        &self,
        user_id: UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        detail: serde_json::Value,
    ) {
        let _ = self
            .audit
            .log(&AuditEntry::export(entity_type, entity_id, detail).for_user(user_id));
    }

    /// Record a failed store operation. A failure to write the log itself
    /// is swallowed so the original error reaches the caller.
    pub fn log_failure(
        &self,
        user_id: Option<UserId>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        error: &LedgerError,
    ) {
        let mut entry = AuditEntry::failed(entity_type, entity_id, error);
        if let Some(user_id) = user_id {
            entry = entry.for_user(user_id);
        }
        let _ = self.audit.log(&entry);
    }
}
