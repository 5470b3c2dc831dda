//! Market data source configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where historical prices come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Yahoo,
    Csv,
    Mock,
}

impl FromStr for DataSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(DataSource::Yahoo),
            "csv" => Ok(DataSource::Csv),
            "mock" => Ok(DataSource::Mock),
            _ => anyhow::bail!(
                "Invalid DATA_SOURCE: {}. Must be 'yahoo', 'csv', or 'mock'",
                s
            ),
        }
    }
}

/// Market data environment configuration
#[derive(Debug, Clone)]
pub struct MarketDataEnvConfig {
    pub source: DataSource,
    pub yahoo_base_url: String,
    pub csv_path: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
}

impl Default for MarketDataEnvConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Yahoo,
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            csv_path: None,
            http_timeout_secs: 30,
            http_connect_timeout_secs: 10,
        }
    }
}

impl MarketDataEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let source = match env::var("DATA_SOURCE") {
            Ok(v) => DataSource::from_str(&v)?,
            Err(_) => defaults.source,
        };
        let csv_path = env::var("CSV_PATH").ok().map(PathBuf::from);
        if source == DataSource::Csv && csv_path.is_none() {
            anyhow::bail!("DATA_SOURCE=csv requires CSV_PATH");
        }

        Ok(Self {
            source,
            yahoo_base_url: env::var("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            csv_path,
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.http_timeout_secs.to_string())
                .parse::<u64>()
                .context("Failed to parse HTTP_TIMEOUT_SECS")?,
            http_connect_timeout_secs: env::var("HTTP_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.http_connect_timeout_secs.to_string())
                .parse::<u64>()
                .context("Failed to parse HTTP_CONNECT_TIMEOUT_SECS")?,
        })
    }
}
