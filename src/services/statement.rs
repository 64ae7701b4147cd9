//! Bank statement CSV parsing
//!
//! Locates the date, description and amount columns from the header row
//! (or assumes `Date,Description,Amount` when the file has no header) and
//! turns each row into a [`BankStatementLine`]. Rows that cannot be parsed
//! are collected as [`RowError`]s rather than failing the whole upload.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{BankStatementLine, Money};

/// Content type accepted regardless of file extension
pub const CSV_CONTENT_TYPE: &str = "text/csv";

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%Y/%m/%d"];

/// Where each field lives in a statement row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementColumns {
    pub date: usize,
    pub description: Option<usize>,
    /// Single signed amount column
    pub amount: Option<usize>,
    /// Money out, for statements with split debit/credit columns
    pub debit: Option<usize>,
    /// Money in
    pub credit: Option<usize>,
}

impl StatementColumns {
    /// `Date,Description,Amount`
    pub fn standard() -> Self {
        Self {
            date: 0,
            description: Some(1),
            amount: Some(2),
            debit: None,
            credit: None,
        }
    }

    /// Map columns from a header row by name
    pub fn from_headers(headers: &StringRecord) -> LedgerResult<Self> {
        let mut date = None;
        let mut description = None;
        let mut amount = None;
        let mut debit = None;
        let mut credit = None;

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();

            if date.is_none() && (h.contains("date") || h.contains("posted")) {
                date = Some(idx);
            } else if amount.is_none() && (h.contains("amount") || h == "value") {
                amount = Some(idx);
            } else if h.contains("debit") || h.contains("withdrawal") {
                debit = Some(idx);
            } else if h.contains("credit") || h.contains("deposit") {
                credit = Some(idx);
            } else if description.is_none()
                && (h.contains("description")
                    || h.contains("payee")
                    || h.contains("merchant")
                    || h.contains("details")
                    || h.contains("memo")
                    || h.contains("name"))
            {
                description = Some(idx);
            }
        }

        let date = date.ok_or_else(|| {
            LedgerError::Import("Statement header has no Date column".into())
        })?;

        if amount.is_none() && (debit.is_none() || credit.is_none()) {
            return Err(LedgerError::Import(
                "Statement header has no Amount column".into(),
            ));
        }
        if amount.is_some() {
            debit = None;
            credit = None;
        }

        Ok(Self {
            date,
            description,
            amount,
            debit,
            credit,
        })
    }
}

/// A statement row that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the file
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of parsing one statement file
#[derive(Debug, Clone, Default)]
pub struct ParsedStatement {
    pub lines: Vec<BankStatementLine>,
    pub errors: Vec<RowError>,
}

/// Reject uploads that are not CSV: the name must end in `.csv` or the
/// declared content type must be `text/csv`
pub fn validate_upload(file_name: &str, content_type: Option<&str>) -> LedgerResult<()> {
    let has_csv_extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let is_csv_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim())
        .is_some_and(|ct| ct.eq_ignore_ascii_case(CSV_CONTENT_TYPE));

    if has_csv_extension || is_csv_type {
        Ok(())
    } else {
        Err(LedgerError::InvalidFileType {
            file_name: file_name.to_string(),
        })
    }
}

/// Parse statement rows from any reader
pub fn parse_statement<R: Read>(reader: R) -> LedgerResult<ParsedStatement> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedStatement::default();
    let mut columns: Option<StatementColumns> = None;

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                parsed.errors.push(RowError {
                    line: e.position().map_or(idx + 1, |p| p.line() as usize),
                    message: format!("Error reading CSV record: {}", e),
                });
                continue;
            }
        };
        let line = record.position().map_or(idx + 1, |p| p.line() as usize);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        if columns.is_none() {
            if looks_like_data_row(&record) {
                columns = Some(StatementColumns::standard());
            } else {
                columns = Some(StatementColumns::from_headers(&record)?);
                continue;
            }
        }
        let Some(mapping) = &columns else { continue };

        match parse_row(&record, mapping) {
            Ok(statement_line) => parsed.lines.push(statement_line),
            Err(message) => parsed.errors.push(RowError { line, message }),
        }
    }

    Ok(parsed)
}

fn parse_row(record: &StringRecord, columns: &StatementColumns) -> Result<BankStatementLine, String> {
    let date_str = record
        .get(columns.date)
        .ok_or_else(|| "Missing date column".to_string())?;
    let date = parse_statement_date(date_str)?;

    let description = columns
        .description
        .and_then(|col| record.get(col))
        .unwrap_or_default();

    let amount = if let Some(col) = columns.amount {
        let amount_str = record
            .get(col)
            .ok_or_else(|| "Missing amount column".to_string())?;
        parse_amount(amount_str)?
    } else {
        let debit = optional_amount(record, columns.debit)?;
        let credit = optional_amount(record, columns.credit)?;
        credit.abs() - debit.abs()
    };

    Ok(BankStatementLine::new(date, description, amount))
}

fn optional_amount(record: &StringRecord, column: Option<usize>) -> Result<Money, String> {
    match column.and_then(|col| record.get(col)) {
        Some(s) if !s.is_empty() => parse_amount(s),
        _ => Ok(Money::zero()),
    }
}

fn parse_amount(s: &str) -> Result<Money, String> {
    if s.is_empty() {
        return Err("Missing amount".to_string());
    }
    Money::parse(s).map_err(|e| format!("Could not parse amount '{}': {}", s, e))
}

/// Parse a statement date, discarding any time of day
pub fn parse_statement_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }

    Err(format!("Could not parse date: '{}'", s))
}

/// A first row whose first field is a date has no header
fn looks_like_data_row(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|first| parse_statement_date(first).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload("statement.csv", None).is_ok());
        assert!(validate_upload("STATEMENT.CSV", None).is_ok());
        assert!(validate_upload("export", Some("text/csv")).is_ok());
        assert!(validate_upload("export", Some("text/csv; charset=utf-8")).is_ok());

        let err = validate_upload("statement.pdf", Some("application/pdf")).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidFileType { .. }));
        assert!(validate_upload("csv", None).is_err());
    }

    #[test]
    fn test_parse_with_header() {
        let data = "Date,Description,Amount\n\
                    2024-01-15,GROCERY STORE,-85.43\n\
                    2024-01-16,SALARY DEPOSIT,3500.00\n";

        let parsed = parse_statement(data.as_bytes()).unwrap();
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0].date, date(2024, 1, 15));
        assert_eq!(parsed.lines[0].description, "GROCERY STORE");
        assert_eq!(parsed.lines[0].amount.cents(), -8543);
        assert_eq!(parsed.lines[1].amount.cents(), 350000);
    }

    #[test]
    fn test_parse_reordered_header_synonyms() {
        let data = "Amount,Posted Date,Payee\n\"$1,200.00\",01/31/2024,RENT\n";

        let parsed = parse_statement(data.as_bytes()).unwrap();
        assert_eq!(parsed.lines.len(), 1);
        assert_eq!(parsed.lines[0].date, date(2024, 1, 31));
        assert_eq!(parsed.lines[0].description, "RENT");
        assert_eq!(parsed.lines[0].amount.cents(), 120000);
    }

    #[test]
    fn test_parse_headerless() {
        let data = "2024-01-17,GAS STATION,-45.20\n2024-01-18,RESTAURANT,(32.15)\n";

        let parsed = parse_statement(data.as_bytes()).unwrap();
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[1].amount.cents(), -3215);
    }

    #[test]
    fn test_parse_debit_credit_columns() {
        let data = "Date,Details,Debit,Credit\n2024-02-01,COFFEE,4.50,\n2024-02-02,REFUND,,10.00\n";

        let parsed = parse_statement(data.as_bytes()).unwrap();
        assert_eq!(parsed.lines[0].amount.cents(), -450);
        assert_eq!(parsed.lines[1].amount.cents(), 1000);
    }

    #[test]
    fn test_bad_rows_reported_and_skipped() {
        let data = "Date,Description,Amount\n\
                    not-a-date,X,1.00\n\
                    2024-01-15,Y,abc\n\
                    \n\
                    2024-01-15,Z,-2.00\n";

        let parsed = parse_statement(data.as_bytes()).unwrap();
        assert_eq!(parsed.lines.len(), 1);
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].line, 2);
        assert!(parsed.errors[1].message.contains("abc"));
    }

    #[test]
    fn test_header_without_amount_is_rejected() {
        let data = "Date,Description\n2024-01-15,X\n";
        let err = parse_statement(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::Import(_)));
    }

    #[test]
    fn test_timestamp_dates_discard_time() {
        assert_eq!(
            parse_statement_date("2024-01-15T23:30:00-05:00").unwrap(),
            date(2024, 1, 15)
        );
        assert_eq!(
            parse_statement_date("2024-01-15T08:00:00").unwrap(),
            date(2024, 1, 15)
        );
        assert_eq!(parse_statement_date("2024/03/09").unwrap(), date(2024, 3, 9));
    }

    #[test]
    fn test_empty_file_has_no_lines() {
        let parsed = parse_statement("".as_bytes()).unwrap();
        assert!(parsed.lines.is_empty());
        assert!(parsed.errors.is_empty());
    }
}
