//! Yahoo Finance chart API client for daily closing prices.

use crate::domain::errors::MarketDataError;
use crate::domain::market::{PricePoint, PriceSeries};
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, error, info};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
    #[serde(default)]
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct YahooMarketDataService {
    client: Client,
    base_url: String,
}

impl YahooMarketDataService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, MarketDataError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| MarketDataError::Request {
            reason: format!("invalid base URL {}: {}", self.base_url, e),
        })?;
        url.path_segments_mut()
            .map_err(|_| MarketDataError::Request {
                reason: format!("base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Parse a chart API body into a price series.
///
/// Bars with a missing close (halts, partial days) are skipped. When the same
/// trading day appears twice the later bar wins.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<PriceSeries, MarketDataError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::Malformed {
            reason: format!("failed to parse chart response for {}: {}", symbol, e),
        })?;

    if let Some(err) = response.chart.error {
        return Err(MarketDataError::Upstream {
            code: err.code,
            description: err.description,
        });
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(symbol));
    };

    let closes = data
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if closes.len() != data.timestamp.len() && !closes.is_empty() {
        return Err(MarketDataError::Malformed {
            reason: format!(
                "{} timestamps but {} closes for {}",
                data.timestamp.len(),
                closes.len(),
                symbol
            ),
        });
    }

    debug!(
        "Parsing {} bars for {} (tz {:?}, offset {}s)",
        data.timestamp.len(),
        symbol,
        data.meta.exchange_timezone_name,
        data.meta.gmtoffset
    );

    let mut points: Vec<PricePoint> = Vec::with_capacity(closes.len());
    for (ts, close) in data.timestamp.iter().zip(closes) {
        let Some(close) = close else {
            continue;
        };
        let date = DateTime::from_timestamp(ts + data.meta.gmtoffset, 0)
            .ok_or_else(|| MarketDataError::Malformed {
                reason: format!("invalid timestamp {} for {}", ts, symbol),
            })?
            .date_naive();

        match points.last_mut() {
            Some(prev) if prev.date == date => prev.close = close,
            _ => points.push(PricePoint { date, close }),
        }
    }

    PriceSeries::new(symbol, points)
}

#[async_trait]
impl MarketDataService for YahooMarketDataService {
    async fn get_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, MarketDataError> {
        let url = self.chart_url(symbol)?;
        let period1 = midnight_utc(start).to_string();
        let period2 = midnight_utc(end).to_string();

        debug!(
            "YahooMarketDataService: Fetching daily bars from {} for {} ({} -> {})",
            url, symbol, start, end
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::Request {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| MarketDataError::Request {
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            error!(
                "YahooMarketDataService: API error {} for {}: {}",
                status, symbol, body
            );
            // Error bodies usually carry a chart.error with a readable description
            return match parse_chart_response(symbol, &body) {
                Err(e @ MarketDataError::Upstream { .. }) => Err(e),
                _ => Err(MarketDataError::Status {
                    status: status.as_u16(),
                    body,
                }),
            };
        }

        let series = parse_chart_response(symbol, &body)?.between(start, end);
        info!(
            "YahooMarketDataService: Fetched {} daily closes for {}",
            series.len(),
            symbol
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"chart":{"result":[{
        "meta":{"currency":"USD","symbol":"AAPL","gmtoffset":-14400,"exchangeTimezoneName":"America/New_York"},
        "timestamp":[1698845400,1698931800,1699018200],
        "indicators":{"quote":[{"close":[173.97,177.57,null],"open":[170.77,175.52,174.24]}]}
    }],"error":null}}"#;

    #[test]
    fn test_parses_closes_and_skips_nulls() {
        let series = parse_chart_response("AAPL", BODY).unwrap();

        assert_eq!(series.closes(), vec![173.97, 177.57]);
        assert_eq!(
            series.first_date(),
            Some(NaiveDate::from_ymd_opt(2023, 11, 1).unwrap())
        );
        assert_eq!(
            series.last_date(),
            Some(NaiveDate::from_ymd_opt(2023, 11, 2).unwrap())
        );
    }

    #[test]
    fn test_upstream_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        assert_eq!(
            parse_chart_response("ZZZZ", body),
            Err(MarketDataError::Upstream {
                code: "Not Found".to_string(),
                description: "No data found, symbol may be delisted".to_string(),
            })
        );
    }

    #[test]
    fn test_range_without_bars_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"indicators":{"quote":[{}]}}],"error":null}}"#;

        let series = parse_chart_response("AAPL", body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_chart_response("AAPL", "<html>"),
            Err(MarketDataError::Malformed { .. })
        ));
    }

    #[test]
    fn test_chart_url_encodes_symbol() {
        let service =
            YahooMarketDataService::new(Client::new(), "https://query1.finance.yahoo.com/");
        let url = service.chart_url("BTC/USD").unwrap();

        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/BTC%2FUSD"
        );
    }

    #[test]
    fn test_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 3).unwrap();
        assert_eq!(midnight_utc(date), 1698969600);
    }
}
