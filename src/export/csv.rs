//! CSV Export functionality
//!
//! Writes the statement comparison, the summary report and the detailed
//! transaction report.

use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{MatchResult, Money, ReportPeriod};
use crate::reports::PeriodReport;

/// File name used for statement comparison downloads
pub const COMPARISON_FILE_NAME: &str = "bank-statement-comparison.csv";

/// Which layout a period report is exported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    #[default]
    Summary,
    Detailed,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detailed => "detailed",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "detailed" => Ok(Self::Detailed),
            other => Err(LedgerError::Validation(format!(
                "Unknown report type '{}', expected summary or detailed",
                other
            ))),
        }
    }
}

/// `financial-report-<period>-<unix millis>.csv`
pub fn report_file_name(period: ReportPeriod, now: DateTime<Utc>) -> String {
    format!("financial-report-{}-{}.csv", period, now.timestamp_millis())
}

/// Export statement match results
pub fn export_comparison_csv<W: Write>(results: &[MatchResult], writer: &mut W) -> LedgerResult<()> {
    writeln!(writer, "Date,Description,Bank Amount,Status,Your Record").map_err(export_error)?;

    for result in results {
        let record = match &result.matched_transaction {
            Some(txn) => format!("{} - {}", dollars(txn.amount), txn.description),
            None => "Not found".to_string(),
        };

        writeln!(
            writer,
            "{},{},{},{},{}",
            result.bank_line.date,
            escape_csv(&result.bank_line.description),
            result.bank_line.amount.to_decimal_string(),
            result.status,
            escape_csv(&record)
        )
        .map_err(export_error)?;
    }

    Ok(())
}

/// Export a period report in the chosen layout
pub fn export_report_csv<W: Write>(
    report: &PeriodReport,
    kind: ReportKind,
    generated_on: NaiveDate,
    writer: &mut W,
) -> LedgerResult<()> {
    match kind {
        ReportKind::Summary => export_summary_csv(report, generated_on, writer),
        ReportKind::Detailed => export_detailed_csv(report, writer),
    }
}

/// Totals followed by the category breakdown
pub fn export_summary_csv<W: Write>(
    report: &PeriodReport,
    generated_on: NaiveDate,
    writer: &mut W,
) -> LedgerResult<()> {
    writeln!(
        writer,
        "Financial Report - {}",
        report.period.as_str().to_uppercase()
    )
    .map_err(export_error)?;
    writeln!(writer, "Generated on: {}", generated_on).map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    writeln!(writer, "SUMMARY").map_err(export_error)?;
    writeln!(writer, "Total Income: {}", dollars(report.total_income)).map_err(export_error)?;
    writeln!(writer, "Total Expenses: {}", dollars(report.total_expenses)).map_err(export_error)?;
    writeln!(writer, "Net Balance: {}", dollars(report.net_balance())).map_err(export_error)?;
    writeln!(writer, "Transaction Count: {}", report.transaction_count).map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    writeln!(writer, "CATEGORY BREAKDOWN").map_err(export_error)?;
    writeln!(writer, "Category,Amount").map_err(export_error)?;
    for category in &report.categories {
        writeln!(
            writer,
            "{},{}",
            escape_csv(&category.category),
            dollars(category.amount)
        )
        .map_err(export_error)?;
    }

    Ok(())
}

/// One row per transaction in the period
pub fn export_detailed_csv<W: Write>(report: &PeriodReport, writer: &mut W) -> LedgerResult<()> {
    writeln!(writer, "Date,Type,Category,Description,Amount").map_err(export_error)?;

    for txn in &report.transactions {
        writeln!(
            writer,
            "{},{},{},\"{}\",{}",
            txn.date,
            txn.kind,
            escape_csv(&txn.category),
            txn.description.replace('"', "\"\""),
            dollars(txn.amount)
        )
        .map_err(export_error)?;
    }

    Ok(())
}

/// `$` followed by the plain two-decimal amount
fn dollars(amount: Money) -> String {
    format!("${}", amount.to_decimal_string())
}

fn export_error(e: std::io::Error) -> LedgerError {
    LedgerError::Export(e.to_string())
}

/// Escape a string for CSV output
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
