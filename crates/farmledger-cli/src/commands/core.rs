//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve the scoring configuration
//! - `service` - Reporting service over an open database
//! - `cmd_init` - Initialize the database

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use farmledger_core::{config, Database, ReportingService, ScoringConfig};

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn load_config(config_path: Option<&Path>) -> Result<ScoringConfig> {
    ScoringConfig::load(config_path).context("Failed to load scoring config")
}

pub fn service(db: &Database, config: &ScoringConfig) -> ReportingService {
    ReportingService::from_store(Arc::new(db.clone()), config.clone())
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    if let Some(path) = config::default_config_path() {
        println!("   Scoring config override: {}", path.display());
    }
    println!();
    println!("Next steps:");
    println!("  1. Import records: farmledger import --file records.json");
    println!("  2. Check health:   farmledger health --user <id>");

    Ok(())
}
