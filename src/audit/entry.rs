//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// A record was created
    Create,
    /// An existing record was replaced
    Update,
    /// A report or comparison was produced
    Export,
    /// An operation against the store failed
    Failed,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Export => write!(f, "EXPORT"),
            Operation::Failed => write!(f, "FAILED"),
        }
    }
}

/// What it happened to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Transaction,
    Budget,
    Statement,
    Report,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Budget => write!(f, "Budget"),
            EntityType::Statement => write!(f, "Statement"),
            EntityType::Report => write!(f, "Report"),
        }
    }
}

/// A single audit log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Record id, date key or file name
    pub entity_id: String,

    /// User the operation ran for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Error text for failed operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    fn base(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            user_id: None,
            before: None,
            after: None,
            error: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id)
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            ..Self::base(Operation::Update, entity_type, entity_id)
        }
    }

    /// A report/comparison file or summary was produced
    pub fn export(entity_type: EntityType, entity_id: impl Into<String>, detail: serde_json::Value) -> Self {
        Self {
            after: Some(detail),
            ..Self::base(Operation::Export, entity_type, entity_id)
        }
    }

    pub fn failed(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        error: impl std::fmt::Display,
    ) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::base(Operation::Failed, entity_type, entity_id)
        }
    }

    pub fn for_user(mut self, user_id: impl std::fmt::Display) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    /// One-line human readable form
    pub fn format_human_readable(&self) -> String {
        let mut line = format!(
            "{} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.entity_type,
            self.entity_id
        );
        if let Some(error) = &self.error {
            line.push_str(&format!(": {}", error));
        }
        line
    }
}
