//! Export of ledgers and reports
//!
//! - Ledger CSV (one row per entry, newest first)
//! - Pretty-printed JSON for a full financial report

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Ledger;
use crate::report::FinancialReport;

const LEDGER_HEADER: [&str; 6] = ["date", "type", "description", "category", "amount", "counterparty"];

/// Format a millisecond timestamp as an ISO-8601 date
pub fn format_date(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Write the ledger as CSV
pub fn ledger_to_csv<W: Write>(ledger: &Ledger, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(LEDGER_HEADER)?;

    for entry in &ledger.entries {
        csv.write_record([
            format_date(entry.date).as_str(),
            entry.kind.as_str(),
            entry.description.as_str(),
            entry.category.as_str(),
            format!("{:.2}", entry.amount).as_str(),
            entry.counterparty.as_deref().unwrap_or(""),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Ledger CSV as a string
pub fn ledger_to_csv_string(ledger: &Ledger) -> Result<String> {
    let mut buf = Vec::new();
    ledger_to_csv(ledger, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Pretty JSON for a financial report
pub fn report_to_json(report: &FinancialReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
