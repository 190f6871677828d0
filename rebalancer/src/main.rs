//! CLI entry point for the rebalancer.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use notional_rebalancer::config::Config;
use notional_rebalancer::execution::{self, CycleOutcome, RunOptions};
use notional_rebalancer::signals::SignalsDocument;

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Notional rebalancer: target allocation → Alpaca market orders")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults plus environment when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan and submit rebalance orders
    Run {
        /// Path to signals.json
        signals: PathBuf,

        /// Show plan without cancelling or submitting
        #[arg(long)]
        dry_run: bool,

        /// Ask for confirmation before submitting
        #[arg(long)]
        confirm: bool,
    },

    /// Show current positions
    Positions,

    /// Check broker connectivity
    Status,

    /// Compare held positions vs target
    Reconcile {
        /// Path to signals.json
        signals: PathBuf,
    },
}

fn load_signals(path: &Path) -> SignalsDocument {
    match SignalsDocument::load(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading signals: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(e.exit_code());
        }
    };

    let result = match cli.command {
        Command::Run {
            signals,
            dry_run,
            confirm,
        } => {
            let doc = load_signals(&signals);
            let opts = RunOptions {
                dry_run,
                confirm,
                signals_file: signals.display().to_string(),
            };
            execution::run(&config, &doc, &opts).map(|outcome| {
                if let CycleOutcome::Completed(report) = outcome {
                    println!("{}", report.summary());
                }
            })
        }
        Command::Positions => execution::show_positions(&config),
        Command::Status => execution::check_status(&config),
        Command::Reconcile { signals } => {
            let doc = load_signals(&signals);
            execution::run_reconcile(&config, &doc)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}
