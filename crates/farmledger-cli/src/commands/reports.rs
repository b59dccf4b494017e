//! Report command implementations
//!
//! Summary, ledger, health and full report commands, plus period resolution.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use farmledger_core::export::{format_date, ledger_to_csv, report_to_json};
use farmledger_core::report::{crop_ranking, expense_breakdown, income_breakdown};
use farmledger_core::{
    AlertSeverity, CategoryShare, Database, FinancialSummary, HealthScore, ScoringConfig,
    TimeWindow,
};

use super::{format_amount, service, truncate};
use crate::cli::PeriodArgs;

const PERIODS: &str =
    "this-month, last-month, this-year, last-30-days, last-90-days, last-12-months, all";

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("Invalid date {}-{:02}-{:02}", year, month, day))
}

/// Resolve a named period (or explicit dates) relative to today
pub fn resolve_period(
    period: &str,
    custom_from: Option<&str>,
    custom_to: Option<&str>,
) -> Result<(NaiveDate, NaiveDate)> {
    resolve_period_at(period, custom_from, custom_to, Utc::now().date_naive())
}

pub fn resolve_period_at(
    period: &str,
    custom_from: Option<&str>,
    custom_to: Option<&str>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    // If custom dates provided, use those
    if let (Some(from), Some(to)) = (custom_from, custom_to) {
        let from_date = NaiveDate::parse_from_str(from, "%Y-%m-%d")
            .context("Invalid --from date format (use YYYY-MM-DD)")?;
        let to_date = NaiveDate::parse_from_str(to, "%Y-%m-%d")
            .context("Invalid --to date format (use YYYY-MM-DD)")?;
        return Ok((from_date, to_date));
    }

    match period.to_lowercase().as_str() {
        "this-month" => Ok((ymd(today.year(), today.month(), 1)?, today)),
        "last-month" => {
            let first_this_month = ymd(today.year(), today.month(), 1)?;
            let last_day = first_this_month
                .pred_opt()
                .context("No month before the calendar start")?;
            Ok((ymd(last_day.year(), last_day.month(), 1)?, last_day))
        }
        "this-year" => Ok((ymd(today.year(), 1, 1)?, today)),
        "last-30-days" => Ok((today - Duration::days(30), today)),
        "last-90-days" => Ok((today - Duration::days(90), today)),
        "last-12-months" => Ok((ymd(today.year() - 1, today.month(), 1)?, today)),
        "all" => Ok((ymd(1970, 1, 1)?, today)),
        _ => anyhow::bail!("Unknown period: {}. Available: {}", period, PERIODS),
    }
}

/// Millisecond window covering whole days `from` through `to` (UTC)
pub fn window_for_dates(from: NaiveDate, to: NaiveDate) -> Result<TimeWindow> {
    let start = from
        .and_hms_opt(0, 0, 0)
        .context("Invalid start time")?
        .and_utc()
        .timestamp_millis();
    let end = to
        .and_hms_milli_opt(23, 59, 59, 999)
        .context("Invalid end time")?
        .and_utc()
        .timestamp_millis();
    TimeWindow::new(start, end).context("--from must not be after --to")
}

pub fn period_window(args: &PeriodArgs) -> Result<TimeWindow> {
    let (from, to) = resolve_period(&args.period, args.from.as_deref(), args.to.as_deref())?;
    window_for_dates(from, to)
}

fn print_period(window: TimeWindow) {
    println!(
        "   Period: {} to {}",
        format_date(window.start),
        format_date(window.end)
    );
}

fn print_shares(title: &str, shares: &[CategoryShare]) {
    println!();
    println!("   {}", title);
    if shares.is_empty() {
        println!("   (none)");
        return;
    }
    println!("   {:24} │ {:>14} │ {:>6}", "Category", "Amount", "%");
    println!("   ─────────────────────────┼────────────────┼───────");
    for share in shares {
        println!(
            "   {:24} │ {:>14} │ {:>5.1}%",
            truncate(&share.label, 24),
            format_amount(share.amount),
            share.percentage
        );
    }
}

fn print_summary(summary: &FinancialSummary) {
    println!("   ─────────────────────────────────────────────────────────");
    println!("   Income:   {:>14}", format_amount(summary.total_income));
    println!("   Expenses: {:>14}", format_amount(summary.total_expense));
    println!("   Net:      {:>14}", format_amount(summary.net_profit));

    print_shares("💰 Income by category", &income_breakdown(summary));
    print_shares("🧾 Expenses by category", &expense_breakdown(summary));

    let crops = crop_ranking(summary);
    if !crops.is_empty() {
        println!();
        println!("   🌾 Crop profitability");
        println!(
            "   {:18} │ {:>12} │ {:>12} │ {:>12}",
            "Crop", "Income", "Expense", "Profit"
        );
        println!("   ───────────────────┼──────────────┼──────────────┼─────────────");
        for crop in crops {
            println!(
                "   {:18} │ {:>12} │ {:>12} │ {:>12}",
                truncate(&crop.crop, 18),
                format_amount(crop.profit.income),
                format_amount(crop.profit.expense),
                format_amount(crop.profit.profit)
            );
        }
    }
}

pub async fn cmd_summary(
    db: &Database,
    config: &ScoringConfig,
    user_id: &str,
    window: TimeWindow,
    json: bool,
) -> Result<()> {
    let summary = service(db, config)
        .summary(user_id, window)
        .await
        .context("Failed to build summary")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("📊 Financial Summary for {}", user_id);
    print_period(window);
    print_summary(&summary);

    Ok(())
}

pub async fn cmd_ledger(
    db: &Database,
    config: &ScoringConfig,
    user_id: &str,
    window: TimeWindow,
    csv_path: Option<&Path>,
) -> Result<()> {
    let ledger = service(db, config)
        .ledger(user_id, window)
        .await
        .context("Failed to build ledger")?;

    if let Some(path) = csv_path {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        ledger_to_csv(&ledger, file).context("Failed to write ledger CSV")?;
        println!(
            "✅ Wrote {} ledger entries to {}",
            ledger.entries.len(),
            path.display()
        );
        return Ok(());
    }

    println!();
    println!("📒 Ledger for {}", user_id);
    print_period(window);
    println!("   ─────────────────────────────────────────────────────────────────────────────");

    if ledger.entries.is_empty() {
        println!("   No entries in this period.");
        return Ok(());
    }

    println!(
        "   {:10} │ {:34} │ {:18} │ {:>12}",
        "Date", "Description", "Category", "Amount"
    );
    println!("   ───────────┼────────────────────────────────────┼────────────────────┼─────────────");
    for entry in &ledger.entries {
        println!(
            "   {:10} │ {:34} │ {:18} │ {:>12}",
            format_date(entry.date),
            truncate(&entry.description, 34),
            truncate(&entry.category, 18),
            format_amount(entry.amount)
        );
    }
    println!();
    println!(
        "   In: {}   Out: {}   Net: {}",
        format_amount(ledger.total_income),
        format_amount(ledger.total_expense),
        format_amount(ledger.net_profit)
    );

    Ok(())
}

fn score_bar(score: u32, max: u32, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        (score as usize * width) / max as usize
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled.min(width)))
}

fn trend_arrow(pct: i64) -> &'static str {
    match pct {
        p if p > 0 => "📈",
        p if p < 0 => "📉",
        _ => "➖",
    }
}

fn print_health(health: &HealthScore) {
    println!(
        "   Overall: {:>3}/100  {}",
        health.overall_score,
        score_bar(health.overall_score, 100, 20)
    );
    println!();
    for category in &health.categories {
        println!(
            "   {:20} {:>2}/{:<2} {}",
            category.name,
            category.score,
            category.max_score,
            score_bar(category.score, category.max_score, 10)
        );
        println!("      {}", category.description);
    }

    if !health.alerts.is_empty() {
        println!();
        println!("   Alerts");
        for alert in &health.alerts {
            let icon = match alert.severity {
                AlertSeverity::Info => "ℹ️ ",
                AlertSeverity::Warning => "⚠️ ",
                AlertSeverity::Danger => "🚨",
            };
            println!("   {} {}", icon, alert.message);
        }
    }

    println!();
    println!("   Trends (net profit)");
    println!(
        "   {} Last month:   {:+}%",
        trend_arrow(health.trends.last_month),
        health.trends.last_month
    );
    println!(
        "   {} Last quarter: {:+}%",
        trend_arrow(health.trends.last_quarter),
        health.trends.last_quarter
    );
    println!(
        "   {} Last year:    {:+}%",
        trend_arrow(health.trends.last_year),
        health.trends.last_year
    );

    // Recommendations for the weakest category
    if let Some(weakest) = health
        .categories
        .iter()
        .filter(|c| c.max_score > 0)
        .min_by_key(|c| c.score * 100 / c.max_score)
    {
        println!();
        println!("   💡 Focus on {}", weakest.name);
        for rec in &weakest.recommendations {
            println!("      • {}", rec);
        }
    }
}

pub async fn cmd_health(
    db: &Database,
    config: &ScoringConfig,
    user_id: &str,
    json: bool,
) -> Result<()> {
    let health = service(db, config)
        .health(user_id)
        .await
        .context("Failed to compute health score")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    println!();
    println!("🩺 Financial Health for {}", user_id);
    println!("   ─────────────────────────────────────────────────────────");
    print_health(&health);

    Ok(())
}

pub async fn cmd_report(
    db: &Database,
    config: &ScoringConfig,
    user_id: &str,
    window: TimeWindow,
    output: Option<&Path>,
) -> Result<()> {
    let report = service(db, config)
        .financial_report(user_id, window)
        .await
        .context("Failed to build report")?;

    if let Some(path) = output {
        let json = report_to_json(&report).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✅ Report written to {}", path.display());
        return Ok(());
    }

    println!();
    println!("📑 Financial Report for {}", user_id);
    print_period(window);
    print_summary(&report.summary);
    println!();
    println!(
        "   {} ledger entries (use --output to save the full report)",
        report.ledger.entries.len()
    );

    Ok(())
}
