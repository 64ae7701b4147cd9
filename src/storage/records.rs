//! Record schema for the persisted collections
//!
//! Collections are stored as loosely typed JSON records, the shape a hosted
//! backend returns: amounts may be numbers or decimal strings, dates may be
//! plain dates or full timestamps. Every record is checked against the
//! schema here and converted to a typed model; anything that doesn't fit is
//! rejected with [`LedgerError::MalformedRecord`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetEntry, Money, Transaction, TransactionType, UserId};

pub const TRANSACTIONS: &str = "transactions";
pub const BUDGETS: &str = "budgets";

/// On-disk layout of a collection file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub records: Vec<Value>,
}

/// Amount as it may appear in a record
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawTransaction {
    id: String,
    user_id: String,
    #[serde(rename = "type")]
    kind: String,
    amount: RawAmount,
    category: String,
    #[serde(default)]
    description: Option<String>,
    date: String,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    user_id: String,
    date: String,
    amount: RawAmount,
    #[serde(default)]
    updated_at: Option<String>,
}

/// Convert a stored record into a [`Transaction`]
pub fn transaction_from_record(index: usize, record: &Value) -> LedgerResult<Transaction> {
    let malformed = |reason: String| LedgerError::malformed(TRANSACTIONS, index, reason);

    let raw: RawTransaction =
        serde_json::from_value(record.clone()).map_err(|e| malformed(e.to_string()))?;

    let amount = parse_amount(&raw.amount).map_err(&malformed)?;
    if amount.is_negative() {
        return Err(malformed(format!("negative amount {}", amount)));
    }

    let kind = raw
        .kind
        .parse::<TransactionType>()
        .map_err(|e| malformed(e.to_string()))?;

    let transaction = Transaction {
        id: raw.id.parse().map_err(|_| malformed(format!("invalid id '{}'", raw.id)))?,
        user_id: parse_user(&raw.user_id).map_err(&malformed)?,
        kind,
        amount,
        category: raw.category,
        description: raw.description.unwrap_or_default(),
        date: parse_record_date(&raw.date).map_err(&malformed)?,
        created_at: parse_timestamp(raw.created_at.as_deref()).map_err(&malformed)?,
    };

    transaction
        .validate()
        .map_err(|e| malformed(e.to_string()))?;

    Ok(transaction)
}

/// Convert a [`Transaction`] into its stored record
pub fn transaction_to_record(transaction: &Transaction) -> Value {
    serde_json::json!({
        "id": transaction.id.to_string(),
        "user_id": transaction.user_id.to_string(),
        "type": transaction.kind.as_str(),
        "amount": transaction.amount.to_decimal_string(),
        "category": transaction.category,
        "description": transaction.description,
        "date": transaction.date.format("%Y-%m-%d").to_string(),
        "created_at": transaction.created_at.to_rfc3339(),
    })
}

/// Convert a stored record into a [`BudgetEntry`]
pub fn budget_from_record(index: usize, record: &Value) -> LedgerResult<BudgetEntry> {
    let malformed = |reason: String| LedgerError::malformed(BUDGETS, index, reason);

    let raw: RawBudget =
        serde_json::from_value(record.clone()).map_err(|e| malformed(e.to_string()))?;

    let amount = parse_amount(&raw.amount).map_err(&malformed)?;
    if amount.is_negative() {
        return Err(malformed(format!("negative budget {}", amount)));
    }

    Ok(BudgetEntry {
        user_id: parse_user(&raw.user_id).map_err(&malformed)?,
        date: parse_record_date(&raw.date).map_err(&malformed)?,
        amount,
        updated_at: parse_timestamp(raw.updated_at.as_deref()).map_err(&malformed)?,
    })
}

/// Convert a [`BudgetEntry`] into its stored record
pub fn budget_to_record(entry: &BudgetEntry) -> Value {
    serde_json::json!({
        "user_id": entry.user_id.to_string(),
        "date": entry.date.format("%Y-%m-%d").to_string(),
        "amount": entry.amount.to_decimal_string(),
        "updated_at": entry.updated_at.to_rfc3339(),
    })
}

/// Normalize a stored date to a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (taken in UTC) and naive
/// `YYYY-MM-DDTHH:MM:SS` timestamps.
pub fn parse_record_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts.date());
        }
    }

    Err(format!("invalid date '{}'", s))
}

fn parse_amount(raw: &RawAmount) -> Result<Money, String> {
    match raw {
        RawAmount::Number(n) => {
            Money::from_f64(*n).ok_or_else(|| format!("amount {} is out of range", n))
        }
        RawAmount::Text(s) => Money::parse(s).map_err(|e| e.to_string()),
    }
}

fn parse_user(s: &str) -> Result<UserId, String> {
    s.parse().map_err(|_| format!("invalid user_id '{}'", s))
}

fn parse_timestamp(s: Option<&str>) -> Result<DateTime<Utc>, String> {
    match s {
        // Older records carry no timestamp; they sort as oldest
        None => Ok(DateTime::<Utc>::UNIX_EPOCH),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|_| format!("invalid timestamp '{}'", s)),
    }
}
