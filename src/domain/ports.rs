use crate::domain::errors::{ForecastError, MarketDataError};
use crate::domain::market::PriceSeries;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of daily closing prices.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Daily closes for `symbol` with dates in `[start, end)`.
    async fn get_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, MarketDataError>;

    fn name(&self) -> &str;
}

/// Pre-trained next-step estimator over a fixed-length scaled window.
///
/// Implementations must be deterministic: the same window always yields the
/// same estimate.
pub trait Predictor: Send + Sync {
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError>;

    /// Window length the model was trained on
    fn input_size(&self) -> usize;

    fn name(&self) -> &str;
}
