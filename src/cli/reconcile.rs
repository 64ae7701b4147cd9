//! Statement reconciliation CLI command

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::json;

use crate::audit::EntityType;
use crate::context::AppContext;
use crate::display::format_match_results;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_comparison_csv, COMPARISON_FILE_NAME};
use crate::notification::Notification;
use crate::services::ReconciliationService;

/// Arguments for `reconcile`
#[derive(Args)]
pub struct ReconcileArgs {
    /// Bank statement CSV file
    pub file: PathBuf,

    /// Declared content type, for files without a .csv extension
    #[arg(long)]
    pub content_type: Option<String>,

    /// Write the comparison CSV to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the comparison CSV to the reports directory
    #[arg(long, conflicts_with = "output")]
    pub export: bool,
}

pub fn handle_reconcile_command(ctx: &AppContext, args: ReconcileArgs) -> LedgerResult<()> {
    let reconciliation = ReconciliationService::new(ctx.storage()).reconcile_file(
        ctx.user_id(),
        &args.file,
        args.content_type.as_deref(),
    )?;

    print!(
        "{}",
        format_match_results(&reconciliation.results, &reconciliation.skipped_rows)
    );
    println!();
    println!("{}", Notification::statement_processed(&reconciliation.summary()));

    let output = match (args.output, args.export) {
        (Some(path), _) => Some(path),
        (None, true) => Some(ctx.paths().reports_dir().join(COMPARISON_FILE_NAME)),
        (None, false) => None,
    };

    if let Some(path) = output {
        write_csv(&path, |w| export_comparison_csv(&reconciliation.results, w))?;

        let summary = reconciliation.summary();
        ctx.storage().log_export(
            ctx.user_id(),
            EntityType::Statement,
            reconciliation.file_name.clone(),
            json!({
                "output": path.display().to_string(),
                "matched": summary.matched,
                "unmatched": summary.unmatched,
            }),
        );

        println!("{}", Notification::comparison_downloaded());
        println!("  Saved to {}", path.display());
    }

    Ok(())
}

/// Create `path` (and its parent directory) and fill it with `export`
pub(crate) fn write_csv<F>(path: &Path, export: F) -> LedgerResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> LedgerResult<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| LedgerError::Export(format!("Failed to create {}: {}", parent.display(), e)))?;
    }

    let file = File::create(path)
        .map_err(|e| LedgerError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    export(&mut writer)?;
    writer
        .flush()
        .map_err(|e| LedgerError::Export(format!("Failed to write {}: {}", path.display(), e)))
}
