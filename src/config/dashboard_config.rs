//! Dashboard defaults parsing from environment variables.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;

/// Initial values of the dashboard settings form
#[derive(Debug, Clone)]
pub struct DashboardEnvConfig {
    pub default_symbol: String,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    pub default_horizon: usize,
    pub max_horizon: usize,
}

impl Default for DashboardEnvConfig {
    fn default() -> Self {
        Self {
            default_symbol: "AAPL".to_string(),
            default_start: NaiveDate::from_ymd_opt(2022, 9, 1).unwrap_or_default(),
            default_end: NaiveDate::from_ymd_opt(2023, 11, 3).unwrap_or_default(),
            default_horizon: 5,
            max_horizon: 365,
        }
    }
}

fn date_var(name: &str, default: NaiveDate) -> Result<NaiveDate> {
    match env::var(name) {
        Ok(v) => NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
            .with_context(|| format!("Failed to parse {} (expected YYYY-MM-DD)", name)),
        Err(_) => Ok(default),
    }
}

impl DashboardEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_horizon = env::var("DEFAULT_HORIZON")
            .unwrap_or_else(|_| defaults.default_horizon.to_string())
            .parse::<usize>()
            .context("Failed to parse DEFAULT_HORIZON")?;
        let max_horizon = env::var("MAX_HORIZON")
            .unwrap_or_else(|_| defaults.max_horizon.to_string())
            .parse::<usize>()
            .context("Failed to parse MAX_HORIZON")?;
        if default_horizon == 0 || default_horizon > max_horizon {
            anyhow::bail!(
                "DEFAULT_HORIZON must be between 1 and MAX_HORIZON ({}), got {}",
                max_horizon,
                default_horizon
            );
        }

        Ok(Self {
            default_symbol: env::var("DEFAULT_SYMBOL").unwrap_or(defaults.default_symbol),
            default_start: date_var("DEFAULT_START_DATE", defaults.default_start)?,
            default_end: date_var("DEFAULT_END_DATE", defaults.default_end)?,
            default_horizon,
            max_horizon,
        })
    }
}
