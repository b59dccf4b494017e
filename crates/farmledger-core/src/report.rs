//! Reporting facade
//!
//! Single entry point for callers that want summaries, ledgers, health
//! scores or a combined report for one user.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classify::format_category_name;
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::health::HealthScorer;
use crate::ledger;
use crate::models::{CropProfit, FinancialSummary, HealthScore, Ledger, TimeWindow};
use crate::store::{ContractStore, OrderStore, TransactionStore};
use crate::summary::{fold_summary, SummaryBuilder};

/// One category's share of its side of the books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// snake_case category key
    pub category: String,
    /// Display label
    pub label: String,
    pub amount: f64,
    /// 0-100; 0 when the side's total is 0
    pub percentage: f64,
}

/// A crop and its profitability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropReport {
    pub crop: String,
    #[serde(flatten)]
    pub profit: CropProfit,
}

/// Summary, ledger and breakdowns for one user and window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub summary: FinancialSummary,
    pub ledger: Ledger,
    pub income_breakdown: Vec<CategoryShare>,
    pub expense_breakdown: Vec<CategoryShare>,
    /// Most profitable first
    pub crops: Vec<CropReport>,
}

/// Orchestrates the summary builder and health scorer
#[derive(Clone)]
pub struct ReportingService {
    builder: SummaryBuilder,
    scorer: HealthScorer,
}

impl ReportingService {
    pub fn new(builder: SummaryBuilder, config: ScoringConfig) -> Self {
        let scorer = HealthScorer::new(builder.clone(), config);
        Self { builder, scorer }
    }

    /// Service over a single store implementing all three sources
    pub fn from_store<S>(store: Arc<S>, config: ScoringConfig) -> Self
    where
        S: TransactionStore + OrderStore + ContractStore + 'static,
    {
        Self::new(SummaryBuilder::from_store(store), config)
    }

    pub async fn summary(&self, user_id: &str, window: TimeWindow) -> Result<FinancialSummary> {
        self.builder.build_summary(user_id, window).await
    }

    pub async fn ledger(&self, user_id: &str, window: TimeWindow) -> Result<Ledger> {
        self.builder.build_ledger(user_id, window).await
    }

    pub async fn health(&self, user_id: &str) -> Result<HealthScore> {
        self.scorer.compute_health(user_id).await
    }

    pub async fn health_at(&self, user_id: &str, now_ms: i64) -> Result<HealthScore> {
        self.scorer.compute_health_at(user_id, now_ms).await
    }

    /// Summary, ledger and breakdowns from a single fetch
    pub async fn financial_report(&self, user_id: &str, window: TimeWindow) -> Result<FinancialReport> {
        let window = TimeWindow::new(window.start, window.end)?;
        let snapshot = self.builder.fetch_snapshot(user_id).await?;

        let summary = fold_summary(user_id, window, &snapshot);
        let ledger = ledger::build_ledger(user_id, window, &snapshot);

        Ok(FinancialReport {
            income_breakdown: income_breakdown(&summary),
            expense_breakdown: expense_breakdown(&summary),
            crops: crop_ranking(&summary),
            summary,
            ledger,
        })
    }
}

pub fn income_breakdown(summary: &FinancialSummary) -> Vec<CategoryShare> {
    shares(
        summary
            .income_by_category
            .iter()
            .map(|(c, v)| (c.as_str(), *v)),
        summary.total_income,
    )
}

pub fn expense_breakdown(summary: &FinancialSummary) -> Vec<CategoryShare> {
    // Bucket sum, not the total: purchase order totals can exceed their items
    let bucket_total: f64 = summary.expense_by_category.values().sum();
    shares(
        summary
            .expense_by_category
            .iter()
            .map(|(c, v)| (c.as_str(), *v)),
        bucket_total,
    )
}

fn shares<'a>(buckets: impl Iterator<Item = (&'a str, f64)>, total: f64) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = buckets
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(key, amount)| CategoryShare {
            category: key.to_string(),
            label: format_category_name(key),
            amount,
            percentage: if total > 0.0 { amount / total * 100.0 } else { 0.0 },
        })
        .collect();

    shares.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

pub fn crop_ranking(summary: &FinancialSummary) -> Vec<CropReport> {
    let mut crops: Vec<CropReport> = summary
        .crop_profitability
        .iter()
        .map(|(crop, profit)| CropReport {
            crop: crop.clone(),
            profit: *profit,
        })
        .collect();

    crops.sort_by(|a, b| {
        b.profit
            .profit
            .total_cmp(&a.profit.profit)
            .then_with(|| a.crop.cmp(&b.crop))
    });
    crops
}
