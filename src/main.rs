use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pocket_ledger::cli::{
    handle_add_command, handle_budget_command, handle_dashboard_command, handle_list_command,
    handle_reconcile_command, handle_report_command, AddArgs, BudgetCommands, ListArgs,
    ReconcileArgs, ReportArgs,
};
use pocket_ledger::config::Theme;
use pocket_ledger::models::UserId;
use pocket_ledger::notification::{Action, Notification};
use pocket_ledger::{AppContext, LedgerResult};

#[derive(Parser)]
#[command(
    name = "pocket",
    version,
    about = "Personal income/expense tracker with daily budgets",
    long_about = "pocket-ledger records income and expenses, tracks a daily budget \
                  on a calendar, matches bank statement CSVs against your records \
                  and exports CSV reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and a user identity
    Init,

    /// Show current configuration and paths
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Set the color theme, or toggle it when none is given
    Theme {
        /// light or dark
        theme: Option<Theme>,
    },

    /// Record an income or expense
    Add(AddArgs),

    /// List recent transactions
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show totals, budget status and trends
    Dashboard,

    /// Daily budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Match a bank statement CSV against your transactions
    Reconcile(ReconcileArgs),

    /// Show a period report and optionally export it as CSV
    Report(ReportArgs),

    /// Show recent audit log entries
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Switch the active user
    SetUser {
        /// User ID
        user: UserId,
    },
}

impl Commands {
    /// The user action whose failure message applies to this command
    fn action(&self) -> Option<Action> {
        match self {
            Commands::Add(_) => Some(Action::AddTransaction),
            Commands::List(_) | Commands::Dashboard => Some(Action::LoadTransactions),
            Commands::Budget(BudgetCommands::Set { .. }) => Some(Action::UpdateBudget),
            Commands::Budget(_) => Some(Action::LoadBudgets),
            Commands::Reconcile(_) => Some(Action::ProcessStatement),
            Commands::Report(_) => Some(Action::ExportReport),
            Commands::Init | Commands::Config { .. } | Commands::Theme { .. } | Commands::Log { .. } => {
                None
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("pocket-ledger - personal income/expense tracker");
        println!();
        println!("Run 'pocket --help' for usage information.");
        return Ok(());
    };

    let mut ctx = AppContext::from_env().context("Failed to open the ledger")?;

    let action = command.action();
    if let Err(e) = run(&mut ctx, command) {
        match action {
            Some(action) => eprintln!("{}", Notification::failure(action, &e)),
            None => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run(ctx: &mut AppContext, command: Commands) -> LedgerResult<()> {
    match command {
        Commands::Init => {
            println!("Initialized pocket-ledger at: {}", ctx.paths().base_dir().display());
            println!("Active user: {}", ctx.user_id());
        }
        Commands::Config { action } => match action {
            Some(ConfigCommands::SetUser { user }) => {
                ctx.set_active_user(user)?;
                println!("Active user set to {}", user);
            }
            None => print_config(ctx),
        },
        Commands::Theme { theme } => {
            let theme = ctx.set_theme(theme)?;
            println!("Theme set to {}", theme);
        }
        Commands::Add(args) => handle_add_command(ctx, args)?,
        Commands::List(args) => handle_list_command(ctx, args)?,
        Commands::Dashboard => handle_dashboard_command(ctx)?,
        Commands::Budget(cmd) => handle_budget_command(ctx, cmd)?,
        Commands::Reconcile(args) => handle_reconcile_command(ctx, args)?,
        Commands::Report(args) => handle_report_command(ctx, args)?,
        Commands::Log { count } => {
            let entries = ctx.storage().audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}

fn print_config(ctx: &AppContext) {
    let paths = ctx.paths();
    let settings = ctx.settings();

    println!("pocket-ledger Configuration");
    println!("===========================");
    println!("Base directory:    {}", paths.base_dir().display());
    println!("Data directory:    {}", paths.data_dir().display());
    println!("Reports directory: {}", paths.reports_dir().display());
    println!("Audit log:         {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Active user:     {}", ctx.user_id());
    println!("  Theme:           {}", settings.theme);
    println!("  Report period:   {}", settings.default_report_period);
}
