//! Record import command

use std::path::Path;

use anyhow::{Context, Result};
use farmledger_core::ImportStats;

use super::open_db;

pub fn cmd_import(db_path: &Path, file: &Path) -> Result<()> {
    println!("📥 Importing records from {}...", file.display());

    let db = open_db(db_path)?;
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let stats = db
        .import_json(&json)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    print_import_stats(&stats);
    Ok(())
}

fn print_import_stats(stats: &ImportStats) {
    println!("   Transactions: {}", stats.transactions);
    println!("   Orders:       {}", stats.orders);
    println!("   Contracts:    {}", stats.contracts);
    if stats.skipped > 0 {
        println!("   Skipped:      {} (already imported)", stats.skipped);
    }
    println!("✅ Imported {} records", stats.imported());
}
