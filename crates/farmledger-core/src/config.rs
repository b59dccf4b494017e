//! Health scoring configuration
//!
//! Thresholds and windows used by the health scorer. Loaded from TOML:
//!
//! 1. An explicit path (`--config`), which must exist
//! 2. The user override at `~/.local/share/farmledger/config/scoring.toml`
//! 3. The embedded default (`config/scoring.toml`)
//!
//! Keys missing from a file keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../config/scoring.toml");

/// Scoring thresholds and windows
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Days covered by the health score
    pub trailing_days: i64,
    /// Length of the short trend window
    pub month_days: i64,
    /// Length of the long trend window
    pub quarter_days: i64,

    /// Average monthly income worth the full income base
    pub income_anchor: f64,
    pub income_cv_penalty: f64,

    pub expense_excellent_ratio: f64,
    pub expense_good_ratio: f64,
    pub expense_fair_ratio: f64,

    pub savings_strong_ratio: f64,
    pub savings_healthy_ratio: f64,

    pub planning_active_months: usize,
    pub debt_placeholder_score: u32,
    pub last_year_trend: i64,

    pub alert_high_expense_ratio: f64,
    pub alert_low_savings_ratio: f64,
    pub alert_income_instability_below: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            trailing_days: 365,
            month_days: 30,
            quarter_days: 90,
            income_anchor: 30_000.0,
            income_cv_penalty: 50.0,
            expense_excellent_ratio: 0.6,
            expense_good_ratio: 0.8,
            expense_fair_ratio: 1.0,
            savings_strong_ratio: 0.2,
            savings_healthy_ratio: 0.1,
            planning_active_months: 3,
            debt_placeholder_score: 15,
            last_year_trend: 12,
            alert_high_expense_ratio: 0.8,
            alert_low_savings_ratio: 0.1,
            alert_income_instability_below: 50,
        }
    }
}

impl ScoringConfig {
    /// Load using the standard resolution order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let content = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                fs::read_to_string(path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            None => read_user_override().unwrap_or_else(|| DEFAULT_CONFIG.to_string()),
        };

        parse_config(&content)
    }

    /// Parse a TOML document over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("farmledger").join("config").join("scoring.toml"))
}

fn read_user_override() -> Option<String> {
    let path = default_config_path()?;
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), "Using scoring config override");
            Some(content)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read scoring config override, using defaults");
            None
        }
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    windows: Option<RawWindows>,
    income: Option<RawIncome>,
    expenses: Option<RawExpenses>,
    savings: Option<RawSavings>,
    planning: Option<RawPlanning>,
    debt: Option<RawDebt>,
    trends: Option<RawTrends>,
    alerts: Option<RawAlerts>,
}

#[derive(Debug, Deserialize)]
struct RawWindows {
    trailing_days: Option<i64>,
    month_days: Option<i64>,
    quarter_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawIncome {
    anchor: Option<f64>,
    cv_penalty: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawExpenses {
    excellent_ratio: Option<f64>,
    good_ratio: Option<f64>,
    fair_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSavings {
    strong_ratio: Option<f64>,
    healthy_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPlanning {
    active_months: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawDebt {
    placeholder_score: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawTrends {
    last_year: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawAlerts {
    high_expense_ratio: Option<f64>,
    low_savings_ratio: Option<f64>,
    income_instability_below: Option<u32>,
}

fn parse_config(content: &str) -> Result<ScoringConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = ScoringConfig::default();

    if let Some(windows) = raw.windows {
        if let Some(days) = windows.trailing_days {
            config.trailing_days = days;
        }
        if let Some(days) = windows.month_days {
            config.month_days = days;
        }
        if let Some(days) = windows.quarter_days {
            config.quarter_days = days;
        }
    }

    if let Some(income) = raw.income {
        if let Some(anchor) = income.anchor {
            config.income_anchor = anchor;
        }
        if let Some(penalty) = income.cv_penalty {
            config.income_cv_penalty = penalty;
        }
    }

    if let Some(expenses) = raw.expenses {
        if let Some(r) = expenses.excellent_ratio {
            config.expense_excellent_ratio = r;
        }
        if let Some(r) = expenses.good_ratio {
            config.expense_good_ratio = r;
        }
        if let Some(r) = expenses.fair_ratio {
            config.expense_fair_ratio = r;
        }
    }

    if let Some(savings) = raw.savings {
        if let Some(r) = savings.strong_ratio {
            config.savings_strong_ratio = r;
        }
        if let Some(r) = savings.healthy_ratio {
            config.savings_healthy_ratio = r;
        }
    }

    if let Some(months) = raw.planning.and_then(|p| p.active_months) {
        config.planning_active_months = months;
    }
    if let Some(score) = raw.debt.and_then(|d| d.placeholder_score) {
        config.debt_placeholder_score = score;
    }
    if let Some(trend) = raw.trends.and_then(|t| t.last_year) {
        config.last_year_trend = trend;
    }

    if let Some(alerts) = raw.alerts {
        if let Some(r) = alerts.high_expense_ratio {
            config.alert_high_expense_ratio = r;
        }
        if let Some(r) = alerts.low_savings_ratio {
            config.alert_low_savings_ratio = r;
        }
        if let Some(below) = alerts.income_instability_below {
            config.alert_income_instability_below = below;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &ScoringConfig) -> Result<()> {
    if config.trailing_days <= 0 || config.month_days <= 0 || config.quarter_days <= 0 {
        return Err(Error::Config("window lengths must be positive".to_string()));
    }
    if config.income_anchor <= 0.0 {
        return Err(Error::Config("income anchor must be positive".to_string()));
    }
    if !(config.expense_excellent_ratio <= config.expense_good_ratio
        && config.expense_good_ratio <= config.expense_fair_ratio)
    {
        return Err(Error::Config(
            "expense ratios must be ordered excellent <= good <= fair".to_string(),
        ));
    }
    if config.savings_healthy_ratio > config.savings_strong_ratio {
        return Err(Error::Config(
            "savings healthy ratio must not exceed the strong ratio".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config_matches_defaults() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = ScoringConfig::from_toml(
            r#"
            [income]
            anchor = 50000.0

            [trends]
            last_year = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.income_anchor, 50_000.0);
        assert_eq!(config.last_year_trend, 0);
        assert_eq!(config.trailing_days, 365);
        assert_eq!(config.expense_good_ratio, 0.8);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(ScoringConfig::from_toml("").unwrap(), ScoringConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ScoringConfig::from_toml("[income\nanchor = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_unordered_expense_ratios() {
        let err = ScoringConfig::from_toml("[expenses]\nexcellent_ratio = 0.9\n").unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("expense ratios")));
    }

    #[test]
    fn test_rejects_non_positive_anchor() {
        assert!(ScoringConfig::from_toml("[income]\nanchor = 0.0\n").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[windows]\nmonth_days = 28").unwrap();

        let config = ScoringConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.month_days, 28);
        assert_eq!(config.quarter_days, 90);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScoringConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("not found")));
    }

    #[test]
    fn test_default_config_path_location() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("farmledger/config/scoring.toml"));
        }
    }
}
