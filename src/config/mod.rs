//! Configuration module for Stockcast.
//!
//! Structured configuration loaded from environment variables (and `.env`
//! via dotenvy in the binaries), organized by concern: Market Data, Model and
//! Dashboard.

mod dashboard_config;
mod market_data_config;
mod model_config;

pub use dashboard_config::DashboardEnvConfig;
pub use market_data_config::{DataSource, MarketDataEnvConfig};
pub use model_config::ModelEnvConfig;

use crate::application::forecast_service::ForecastSettings;
use anyhow::{Context, Result};
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub market_data: MarketDataEnvConfig,
    pub model: ModelEnvConfig,
    pub dashboard: DashboardEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let market_data =
            MarketDataEnvConfig::from_env().context("Failed to load market data config")?;
        let model = ModelEnvConfig::from_env().context("Failed to load model config")?;
        let dashboard =
            DashboardEnvConfig::from_env().context("Failed to load dashboard config")?;

        Ok(Self {
            market_data,
            model,
            dashboard,
        })
    }

    pub fn forecast_settings(&self) -> ForecastSettings {
        ForecastSettings {
            window_size: self.model.window_size,
            train_split: self.model.train_split,
            evaluate_holdout: self.model.evaluate_holdout,
            max_horizon: self.dashboard.max_horizon,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.market_data.http_timeout_secs)
    }

    pub fn http_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.market_data.http_connect_timeout_secs)
    }
}
