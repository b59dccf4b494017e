//! Financial health scorer
//!
//! Combines five capped sub-scores into a 0-100 score:
//!
//! | Sub-score          | Max | Driven by                                   |
//! |--------------------|-----|---------------------------------------------|
//! | Income Stability   | 60  | monthly income level and its variation      |
//! | Expense Management | 35  | expense / income                            |
//! | Debt Management    | 15  | constant until a debt source exists         |
//! | Savings & Reserves | 20  | net profit / income                         |
//! | Financial Planning | 10  | months with at least one transaction        |
//!
//! One snapshot is fetched per call. The trailing-year summary and the four
//! trend windows are all folded from it, so every figure in a score comes
//! from the same view of the data.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::models::{
    AlertSeverity, FinancialSummary, HealthAlert, HealthCategory, HealthCategoryId, HealthScore,
    PartyRole, TimeWindow, TransactionKind, Trends,
};
use crate::summary::{fold_summary, LedgerSnapshot, SummaryBuilder};

/// Computes health scores from the ledger sources
#[derive(Clone)]
pub struct HealthScorer {
    builder: SummaryBuilder,
    config: ScoringConfig,
}

impl HealthScorer {
    pub fn new(builder: SummaryBuilder, config: ScoringConfig) -> Self {
        Self { builder, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score the trailing year ending now
    pub async fn compute_health(&self, user_id: &str) -> Result<HealthScore> {
        self.compute_health_at(user_id, Utc::now().timestamp_millis())
            .await
    }

    /// Score the trailing year ending at `now_ms`
    pub async fn compute_health_at(&self, user_id: &str, now_ms: i64) -> Result<HealthScore> {
        let snapshot = self.builder.fetch_snapshot(user_id).await?;
        Ok(score_snapshot(user_id, now_ms, &snapshot, &self.config))
    }
}

/// Score an already-fetched snapshot
pub fn score_snapshot(
    user_id: &str,
    now_ms: i64,
    snapshot: &LedgerSnapshot,
    config: &ScoringConfig,
) -> HealthScore {
    let year = TimeWindow::trailing_days(now_ms, config.trailing_days);
    let summary = fold_summary(user_id, year, snapshot);

    if summary.total_income == 0.0 && summary.total_expense == 0.0 && snapshot.transactions.is_empty()
    {
        debug!(user_id, "No financial data, returning empty health score");
        return empty_score(summary);
    }

    let income = income_stability_score(user_id, year, snapshot, config);
    let expenses = expense_management_score(&summary, config);
    let debt = config.debt_placeholder_score;
    let savings = savings_score(&summary, config);
    let planning = planning_score(snapshot, config);

    let categories: Vec<HealthCategory> = [
        (HealthCategoryId::Income, income),
        (HealthCategoryId::Expenses, expenses),
        (HealthCategoryId::Debt, debt),
        (HealthCategoryId::Savings, savings),
        (HealthCategoryId::Planning, planning),
    ]
    .into_iter()
    .map(|(id, score)| category(id, score.min(id.max_score()), description(id)))
    .collect();

    let total: u32 = categories.iter().map(|c| c.score).sum();
    let overall_score = total.min(100);

    let alerts = if has_records(user_id, year, snapshot) {
        alerts(&summary, income.min(HealthCategoryId::Income.max_score()), config)
    } else {
        vec![]
    };

    let trends = Trends {
        last_month: windowed_trend(user_id, now_ms, config.month_days, snapshot),
        last_quarter: windowed_trend(user_id, now_ms, config.quarter_days, snapshot),
        last_year: config.last_year_trend,
    };

    debug!(
        user_id,
        overall_score,
        income,
        expenses,
        savings,
        planning,
        alerts = alerts.len(),
        "Computed health score"
    );

    HealthScore {
        overall_score,
        categories,
        alerts,
        trends,
        summary,
    }
}

fn empty_score(summary: FinancialSummary) -> HealthScore {
    HealthScore {
        overall_score: 0,
        categories: HealthCategoryId::ALL
            .into_iter()
            .map(|id| category(id, 0, no_data_description(id)))
            .collect(),
        alerts: vec![],
        trends: Trends::default(),
        summary,
    }
}

fn category(id: HealthCategoryId, score: u32, description: &str) -> HealthCategory {
    HealthCategory {
        id,
        name: id.name().to_string(),
        score,
        max_score: id.max_score(),
        description: description.to_string(),
        recommendations: recommendations(id).iter().map(|r| r.to_string()).collect(),
    }
}

/// Round half away from zero to a whole, non-negative score
fn whole(score: f64) -> u32 {
    score.round().max(0.0) as u32
}

/// Month key: year * 12 + zero-based month, in UTC
fn month_key(ts: i64) -> Option<i64> {
    DateTime::<Utc>::from_timestamp_millis(ts).map(|d| d.year() as i64 * 12 + d.month0() as i64)
}

/// Income received per calendar month
///
/// Income transactions count whatever their date. Sales orders and
/// contract payments count only inside the window.
fn monthly_income(user_id: &str, window: TimeWindow, snapshot: &LedgerSnapshot) -> BTreeMap<i64, f64> {
    let mut months: BTreeMap<i64, f64> = BTreeMap::new();
    let mut add = |ts: i64, amount: f64| {
        if let Some(key) = month_key(ts) {
            *months.entry(key).or_insert(0.0) += amount;
        }
    };

    for tx in &snapshot.transactions {
        if let TransactionKind::Income { .. } = tx.kind {
            add(tx.date, tx.amount);
        }
    }
    for order in snapshot
        .sales_orders
        .iter()
        .filter(|o| window.contains(o.created_at))
    {
        add(order.created_at, order.total_amount);
    }
    for (_, _, amount, date, role) in snapshot.payments_in(user_id, window) {
        if role == PartyRole::Receiver {
            add(date, amount);
        }
    }

    months
}

fn income_stability_score(
    user_id: &str,
    window: TimeWindow,
    snapshot: &LedgerSnapshot,
    config: &ScoringConfig,
) -> u32 {
    let months = monthly_income(user_id, window, snapshot);
    let total: f64 = months.values().sum();
    if months.is_empty() || total <= 0.0 {
        return 0;
    }

    let count = months.len() as f64;
    let mean = total / count;
    let base = (mean / config.income_anchor * 40.0).min(40.0);

    let bonus = if months.len() < 2 {
        0.0
    } else {
        let variance = months.values().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let cv = variance.sqrt() / mean;
        (20.0 - cv * config.income_cv_penalty).max(0.0)
    };

    whole(base + bonus).min(HealthCategoryId::Income.max_score())
}

fn expense_management_score(summary: &FinancialSummary, config: &ScoringConfig) -> u32 {
    match summary.expense_ratio() {
        None => 0,
        Some(r) if r <= config.expense_excellent_ratio => 35,
        Some(r) if r <= config.expense_good_ratio => 25,
        Some(r) if r < config.expense_fair_ratio => 15,
        Some(_) => 0,
    }
}

fn savings_score(summary: &FinancialSummary, config: &ScoringConfig) -> u32 {
    match summary.savings_ratio() {
        None => 0,
        Some(r) if r >= config.savings_strong_ratio => 20,
        Some(r) if r >= config.savings_healthy_ratio => 15,
        Some(r) if r > 0.0 => 10,
        Some(_) => 0,
    }
}

/// Distinct months with any transaction, regardless of window
fn planning_score(snapshot: &LedgerSnapshot, config: &ScoringConfig) -> u32 {
    let active: BTreeSet<i64> = snapshot
        .transactions
        .iter()
        .filter_map(|t| month_key(t.date))
        .collect();

    if active.len() >= config.planning_active_months {
        10
    } else if !active.is_empty() {
        5
    } else {
        0
    }
}

fn has_records(user_id: &str, window: TimeWindow, snapshot: &LedgerSnapshot) -> bool {
    !snapshot.transactions.is_empty()
        || snapshot
            .sales_orders
            .iter()
            .chain(&snapshot.purchase_orders)
            .any(|o| window.contains(o.created_at))
        || snapshot.payments_in(user_id, window).next().is_some()
}

fn alerts(summary: &FinancialSummary, income_score: u32, config: &ScoringConfig) -> Vec<HealthAlert> {
    let mut alerts = Vec::new();

    let expense_ratio = summary.expense_ratio().unwrap_or(1.0);
    if summary.total_expense > 0.0 && expense_ratio > config.alert_high_expense_ratio {
        alerts.push(HealthAlert::new(
            "high_expenses",
            AlertSeverity::Warning,
            "Your expenses are over 80% of your income. Look for ways to reduce costs.",
        ));
    }

    if income_score > 0 && income_score < config.alert_income_instability_below {
        alerts.push(HealthAlert::new(
            "income_instability",
            AlertSeverity::Warning,
            "Your income varies significantly. Consider diversifying income sources.",
        ));
    }

    if let Some(ratio) = summary.savings_ratio() {
        if ratio < config.alert_low_savings_ratio {
            alerts.push(HealthAlert::new(
                "low_savings",
                AlertSeverity::Danger,
                "Your emergency fund is insufficient. Aim to save at least 10% of your income.",
            ));
        }
    }

    alerts
}

/// Net-profit change between the last `days` and the `days` before that
fn windowed_trend(user_id: &str, now_ms: i64, days: i64, snapshot: &LedgerSnapshot) -> i64 {
    let current_window = TimeWindow::trailing_days(now_ms, days);
    let current = fold_summary(user_id, current_window, snapshot);
    let previous = fold_summary(user_id, current_window.preceding(), snapshot);
    trend(&current, &previous)
}

/// Whole-percent change in net profit; 0 when the previous window has no
/// income or no net profit to compare against
pub fn trend(current: &FinancialSummary, previous: &FinancialSummary) -> i64 {
    if previous.total_income == 0.0 || previous.net_profit == 0.0 {
        return 0;
    }
    ((current.net_profit - previous.net_profit) / previous.net_profit * 100.0).round() as i64
}

fn description(id: HealthCategoryId) -> &'static str {
    match id {
        HealthCategoryId::Income => {
            "This measures how consistent your income is throughout the year."
        }
        HealthCategoryId::Expenses => {
            "This measures how well you manage your expenses relative to income."
        }
        HealthCategoryId::Debt => "This measures how well you manage loans and other debts.",
        HealthCategoryId::Savings => {
            "This measures your ability to save and build financial reserves."
        }
        HealthCategoryId::Planning => "This measures how well you plan and budget your finances.",
    }
}

fn no_data_description(id: HealthCategoryId) -> &'static str {
    match id {
        HealthCategoryId::Income => "No income data available to assess stability.",
        HealthCategoryId::Expenses => "No expense data available to assess management.",
        HealthCategoryId::Debt => "No debt data available to assess management.",
        HealthCategoryId::Savings => "No savings data available to assess reserves.",
        HealthCategoryId::Planning => "No planning data available to assess.",
    }
}

fn recommendations(id: HealthCategoryId) -> [&'static str; 3] {
    match id {
        HealthCategoryId::Income => [
            "Diversify your crop selection to spread harvests throughout the year",
            "Consider adding value-added products to your farm offerings",
            "Explore contract farming opportunities for guaranteed income",
        ],
        HealthCategoryId::Expenses => [
            "Group purchase fertilizers with neighboring farmers for bulk discounts",
            "Implement precision farming to reduce input waste",
            "Consider equipment sharing instead of purchasing new machinery",
        ],
        HealthCategoryId::Debt => [
            "Refinance high-interest loans through Kisan Credit Card",
            "Prioritize paying off loans with highest interest rates first",
            "Consider consolidating multiple small loans",
        ],
        HealthCategoryId::Savings => [
            "Aim to save 10% of each sale in a separate emergency account",
            "Explore agricultural insurance options to protect against crop failure",
            "Consider diversifying income sources beyond farming",
        ],
        HealthCategoryId::Planning => [
            "Create a seasonal budget that accounts for variable income",
            "Set specific financial goals with timelines",
            "Review and update your financial plan quarterly",
        ],
    }
}
