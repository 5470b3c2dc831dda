//! Offline price source reading a Yahoo-style CSV export
//! (`Date,Open,High,Low,Close,Adj Close,Volume`).

use crate::domain::errors::MarketDataError;
use crate::domain::market::{PricePoint, PriceSeries};
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct CsvMarketDataService {
    path: PathBuf,
}

impl CsvMarketDataService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Parse CSV text into a price series. Rows whose close is empty or `null` are skipped.
pub fn parse_price_csv(symbol: &str, text: &str) -> Result<PriceSeries, MarketDataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| MarketDataError::Malformed {
            reason: format!("unreadable CSV header: {}", e),
        })?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| MarketDataError::Malformed {
                reason: format!("CSV has no '{}' column", name),
            })
    };
    let date_idx = column("Date")?;
    let close_idx = column("Close")?;

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| MarketDataError::Malformed {
            reason: format!("CSV row {}: {}", line + 2, e),
        })?;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let raw_close = record.get(close_idx).unwrap_or_default();
        if raw_close.is_empty() || raw_close.eq_ignore_ascii_case("null") {
            skipped += 1;
            continue;
        }

        // Some exports append a time to the date ("2023-11-03 00:00:00-04:00")
        let date_part = raw_date.get(..10).unwrap_or(raw_date);
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
            MarketDataError::Malformed {
                reason: format!("CSV row {}: bad date '{}': {}", line + 2, raw_date, e),
            }
        })?;
        let close = raw_close
            .parse::<f64>()
            .map_err(|e| MarketDataError::Malformed {
                reason: format!("CSV row {}: bad close '{}': {}", line + 2, raw_close, e),
            })?;

        points.push(PricePoint { date, close });
    }

    if skipped > 0 {
        warn!("Skipped {} CSV rows without a close for {}", skipped, symbol);
    }

    PriceSeries::new(symbol, points)
}

#[async_trait]
impl MarketDataService for CsvMarketDataService {
    async fn get_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, MarketDataError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| MarketDataError::Io {
                reason: format!("{}: {}", self.path.display(), e),
            })?;

        let series = parse_price_csv(symbol, &text)?.between(start, end);
        info!(
            "CsvMarketDataService: Loaded {} daily closes for {} from {:?}",
            series.len(),
            symbol,
            self.path
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "CSV file"
    }
}
