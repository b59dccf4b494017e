//! Farm Ledger CLI
//!
//! Usage:
//!   farmledger init                          Initialize database
//!   farmledger import --file records.json    Import transactions, orders, contracts
//!   farmledger summary --user ID             Income/expense summary
//!   farmledger ledger --user ID --csv out    Unified ledger (optionally as CSV)
//!   farmledger health --user ID              Financial health score
//!   farmledger report --user ID -o out.json  Full report as JSON

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file } => commands::cmd_import(&cli.db, &file),
        Commands::Summary { user, period, json } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let window = commands::period_window(&period)?;
            commands::cmd_summary(&db, &config, &user, window, json).await
        }
        Commands::Ledger { user, period, csv } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let window = commands::period_window(&period)?;
            commands::cmd_ledger(&db, &config, &user, window, csv.as_deref()).await
        }
        Commands::Health { user, json } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_health(&db, &config, &user, json).await
        }
        Commands::Report {
            user,
            period,
            output,
        } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let window = commands::period_window(&period)?;
            commands::cmd_report(&db, &config, &user, window, output.as_deref()).await
        }
    }
}
