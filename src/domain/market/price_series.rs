//! Daily closing price history for a single symbol.

use crate::domain::errors::MarketDataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered closing prices.
///
/// # Invariants
///
/// - Dates are strictly ascending (no duplicates)
/// - Every close is finite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, sorting by date and rejecting duplicate dates or non-finite closes.
    pub fn new(
        symbol: impl Into<String>,
        mut points: Vec<PricePoint>,
    ) -> Result<Self, MarketDataError> {
        let symbol = symbol.into();

        if let Some(bad) = points.iter().find(|p| !p.close.is_finite()) {
            return Err(MarketDataError::Malformed {
                reason: format!("non-finite close {} on {} for {}", bad.close, bad.date, symbol),
            });
        }

        points.sort_by_key(|p| p.date);

        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(MarketDataError::Malformed {
                reason: format!("duplicate date {} for {}", pair[0].date, symbol),
            });
        }

        Ok(Self { symbol, points })
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Points whose date falls in `[start, end)`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date < end)
                .copied()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 11, d).unwrap()
    }

    #[test]
    fn test_points_are_sorted_by_date() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint { date: day(3), close: 3.0 },
                PricePoint { date: day(1), close: 1.0 },
                PricePoint { date: day(2), close: 2.0 },
            ],
        )
        .unwrap();

        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first_date(), Some(day(1)));
        assert_eq!(series.last_date(), Some(day(3)));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let result = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint { date: day(1), close: 1.0 },
                PricePoint { date: day(1), close: 1.5 },
            ],
        );

        assert!(matches!(result, Err(MarketDataError::Malformed { .. })));
    }

    #[test]
    fn test_non_finite_close_rejected() {
        let result = PriceSeries::new(
            "AAPL",
            vec![PricePoint {
                date: day(1),
                close: f64::NAN,
            }],
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_between_is_end_exclusive() {
        let series = PriceSeries::new(
            "AAPL",
            (1..=5)
                .map(|d| PricePoint {
                    date: day(d),
                    close: d as f64,
                })
                .collect(),
        )
        .unwrap();

        let window = series.between(day(2), day(4));
        assert_eq!(window.closes(), vec![2.0, 3.0]);
        assert_eq!(window.symbol(), "AAPL");
    }
}
