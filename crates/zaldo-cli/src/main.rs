mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::collections::{ArrearsArgs, ScheduleArgs};
use commands::documents::{AmountWordsArgs, CertificateArgs, PromissoryNoteArgs, ReceiptArgs};
use commands::ledger::{PortfolioArgs, SplitArgs, StatementArgs, WalletArgs};
use commands::maintenance::MaintenanceArgs;
use commands::Context;

/// Loan ledger, profit split and investor wallet calculations
#[derive(Parser)]
#[command(
    name = "zaldo",
    version,
    about = "Loan ledger, profit split and investor wallet calculations",
    long_about = "A CLI over the ZALDO ledger engine. Reads loans, payments and payouts \
                  as JSON (file or stdin) and computes interest splits, investor statements, \
                  portfolio totals, simulated wallets, arrears and record corrections."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Policy file (YAML or JSON) overriding the policy of every input
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log filter, e.g. "debug" or "zaldo::audit=info" (defaults to $ZALDO_LOG, then "warn")
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an interest or late-fee payment between operator and investor
    Split(SplitArgs),
    /// Investor statement with simulated wallet and movements
    Statement(StatementArgs),
    /// Portfolio totals, per-investor shares and arrears alerts
    Portfolio(PortfolioArgs),
    /// Replay the liquid wallet of the portfolio or one investor
    Wallet(WalletArgs),
    /// Next cutoff date and expected monthly interest for a loan
    Schedule(ScheduleArgs),
    /// Due dates and lateness for every outstanding loan
    Arrears(ArrearsArgs),
    /// Peso amount in Spanish words
    AmountWords(AmountWordsArgs),
    /// Discharge certificate text for a settled loan
    Certificate(CertificateArgs),
    /// Promissory note text for a loan
    PromissoryNote(PromissoryNoteArgs),
    /// Receipt text for a recorded payment
    Receipt(ReceiptArgs),
    /// Apply audited corrections and report duplicate payments
    Maintenance(MaintenanceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_env("ZALDO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let ctx = match cli.config.as_deref().map(config::load_policy).transpose() {
        Ok(policy) => Context { policy },
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(2);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Split(args) => commands::ledger::run_split(args, &ctx),
        Commands::Statement(args) => commands::ledger::run_statement(args, &ctx),
        Commands::Portfolio(args) => commands::ledger::run_portfolio(args, &ctx),
        Commands::Wallet(args) => commands::ledger::run_wallet(args, &ctx),
        Commands::Schedule(args) => commands::collections::run_schedule(args, &ctx),
        Commands::Arrears(args) => commands::collections::run_arrears(args, &ctx),
        Commands::AmountWords(args) => commands::documents::run_amount_words(args),
        Commands::Certificate(args) => commands::documents::run_certificate(args),
        Commands::PromissoryNote(args) => commands::documents::run_promissory_note(args),
        Commands::Receipt(args) => commands::documents::run_receipt(args),
        Commands::Maintenance(args) => commands::maintenance::run_maintenance(args),
        Commands::Version => {
            println!("zaldo {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
