use crate::domain::errors::MarketDataError;
use crate::domain::market::{PricePoint, PriceSeries};
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory price source for tests and offline demos.
///
/// Symbols without registered prices yield an empty series.
#[derive(Default)]
pub struct MockMarketDataService {
    series: RwLock<HashMap<String, PriceSeries>>,
    failure: RwLock<Option<MarketDataError>>,
}

impl MockMarketDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn insert(&self, series: PriceSeries) {
        let mut map = match self.series.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.insert(series.symbol().to_uppercase(), series);
    }

    /// Make every subsequent fetch fail with `error`.
    pub fn fail_with(&self, error: MarketDataError) {
        let mut failure = match self.failure.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *failure = Some(error);
    }

    /// A smooth synthetic daily series of `days` closes starting at `start`.
    pub fn synthetic_series(symbol: &str, start: NaiveDate, days: usize) -> PriceSeries {
        let points = start
            .iter_days()
            .take(days)
            .enumerate()
            .map(|(i, date)| {
                let t = i as f64;
                PricePoint {
                    date,
                    close: 150.0 + 0.05 * t + 8.0 * (t / 9.0).sin(),
                }
            })
            .collect();

        PriceSeries::new(symbol, points).unwrap_or_else(|_| PriceSeries::empty(symbol))
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn get_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, MarketDataError> {
        if let Some(err) = self
            .failure
            .read()
            .ok()
            .and_then(|failure| failure.clone())
        {
            return Err(err);
        }

        let map = match self.series.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let series = map
            .get(&symbol.to_uppercase())
            .map(|s| s.between(start, end))
            .unwrap_or_else(|| PriceSeries::empty(symbol));

        debug!(
            "MockMarketDataService: {} closes for {} in [{}, {})",
            series.len(),
            symbol,
            start,
            end
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
