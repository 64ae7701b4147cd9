//! Report CLI commands

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use serde_json::json;

use crate::audit::EntityType;
use crate::context::AppContext;
use crate::display::format_transaction_table;
use crate::error::LedgerResult;
use crate::export::{export_report_csv, report_file_name, ReportKind};
use crate::models::ReportPeriod;
use crate::notification::Notification;
use crate::reports::{Dashboard, PeriodReport};

use super::reconcile::write_csv;

/// Arguments for `report`
#[derive(Args)]
pub struct ReportArgs {
    /// week, month, quarter or year (defaults to the configured period)
    #[arg(short, long)]
    pub period: Option<ReportPeriod>,

    /// CSV layout: summary or detailed
    #[arg(short, long, default_value = "summary")]
    pub kind: ReportKind,

    /// Write the CSV to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the CSV to the reports directory with a generated name
    #[arg(long, conflicts_with = "output")]
    pub export: bool,
}

pub fn handle_report_command(ctx: &AppContext, args: ReportArgs) -> LedgerResult<()> {
    let period = args
        .period
        .unwrap_or(ctx.settings().default_report_period);
    let today = ctx.today();

    let report = PeriodReport::for_user(ctx.storage(), ctx.user_id(), period, today)?;
    print!("{}", report.format_terminal());

    let output = match (args.output, args.export) {
        (Some(path), _) => Some(path),
        (None, true) => Some(ctx.paths().reports_dir().join(report_file_name(period, Utc::now()))),
        (None, false) => None,
    };

    if let Some(path) = output {
        write_csv(&path, |w| export_report_csv(&report, args.kind, today, w))?;

        ctx.storage().log_export(
            ctx.user_id(),
            EntityType::Report,
            path.display().to_string(),
            json!({
                "period": period.as_str(),
                "kind": args.kind.as_str(),
                "transactions": report.transaction_count,
            }),
        );

        println!();
        println!("{}", Notification::report_downloaded(args.kind.as_str(), period));
        println!("  Saved to {}", path.display());
    }

    Ok(())
}

pub fn handle_dashboard_command(ctx: &AppContext) -> LedgerResult<()> {
    let dashboard = Dashboard::for_user(ctx.storage(), ctx.user_id(), ctx.today())?;
    print!("{}", dashboard.format_terminal());

    println!("\nRecent Transactions");
    print!("{}", format_transaction_table(&dashboard.recent));
    Ok(())
}
