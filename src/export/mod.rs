//! Export module for pocket-ledger
//!
//! CSV downloads: the bank statement comparison and the summary or detailed
//! period report.

pub mod csv;

pub use csv::{
    export_comparison_csv, export_detailed_csv, export_report_csv, export_summary_csv,
    report_file_name, ReportKind, COMPARISON_FILE_NAME,
};
