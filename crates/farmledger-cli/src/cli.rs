//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Farm Ledger - income, expenses and financial health for farms
#[derive(Parser)]
#[command(name = "farmledger")]
#[command(about = "Farm financial summaries, ledgers and health scores", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "farmledger.db", global = true)]
    pub db: PathBuf,

    /// Scoring config file (defaults to the user override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions, orders and contracts from a JSON file
    Import {
        /// JSON file with `transactions`, `orders` and `contracts` arrays
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Income/expense summary with category and crop breakdowns
    Summary {
        /// User to summarize
        #[arg(short, long)]
        user: String,

        #[command(flatten)]
        period: PeriodArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Unified ledger of transactions, orders and contract payments
    Ledger {
        /// User whose ledger to show
        #[arg(short, long)]
        user: String,

        #[command(flatten)]
        period: PeriodArgs,

        /// Write the ledger to this CSV file instead of printing it
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Financial health score for the trailing year
    Health {
        /// User to score
        #[arg(short, long)]
        user: String,

        /// Print the score as JSON
        #[arg(long)]
        json: bool,
    },

    /// Full financial report (summary, ledger, breakdowns)
    Report {
        /// User to report on
        #[arg(short, long)]
        user: String,

        #[command(flatten)]
        period: PeriodArgs,

        /// Write the report as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Reporting period selection
#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
    /// Time period: this-month, last-month, this-year, last-30-days, last-90-days, last-12-months, all
    #[arg(long, default_value = "this-month")]
    pub period: String,

    /// Custom start date (YYYY-MM-DD) - overrides period
    #[arg(long)]
    pub from: Option<String>,

    /// Custom end date (YYYY-MM-DD) - overrides period
    #[arg(long)]
    pub to: Option<String>,
}
