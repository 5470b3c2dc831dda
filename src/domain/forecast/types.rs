use crate::domain::errors::ForecastError;
use crate::domain::market::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One "make prediction" action from the dashboard or CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub symbol: String,
    pub start: NaiveDate,
    /// Exclusive upper bound of the history window
    pub end: NaiveDate,
    /// Number of future predictions
    pub horizon: usize,
}

impl ForecastRequest {
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate, horizon: usize) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            start,
            end,
            horizon,
        }
    }

    pub fn validate(&self, max_horizon: usize) -> Result<(), ForecastError> {
        if self.symbol.is_empty() {
            return Err(ForecastError::invalid("stock symbol must not be empty"));
        }
        if self.end <= self.start {
            return Err(ForecastError::invalid(format!(
                "end date {} must be after start date {}",
                self.end, self.start
            )));
        }
        if self.horizon == 0 {
            return Err(ForecastError::invalid(
                "number of future predictions must be at least 1",
            ));
        }
        if self.horizon > max_horizon {
            return Err(ForecastError::invalid(format!(
                "number of future predictions {} exceeds the limit of {}",
                self.horizon, max_horizon
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Predicted closes for consecutive days after the last observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn from_parts(dates: Vec<NaiveDate>, prices: Vec<f64>) -> Result<Self, ForecastError> {
        if dates.len() != prices.len() {
            return Err(ForecastError::invalid(format!(
                "{} forecast dates for {} predictions",
                dates.len(),
                prices.len()
            )));
        }

        Ok(Self {
            points: dates
                .into_iter()
                .zip(prices)
                .map(|(date, price)| ForecastPoint { date, price })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

/// One-step-ahead accuracy on the held-out tail of the history, in price units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldoutEvaluation {
    pub samples: usize,
    pub rmse: f64,
    pub mape_pct: f64,
}

impl HoldoutEvaluation {
    /// Compare predictions against actual values pairwise. `None` when there is nothing to compare.
    pub fn from_pairs(predicted: &[f64], actual: &[f64]) -> Option<Self> {
        let samples = predicted.len().min(actual.len());
        if samples == 0 {
            return None;
        }

        let mut sq_err = 0.0;
        let mut pct_err = 0.0;
        let mut pct_samples = 0usize;
        for (p, a) in predicted.iter().zip(actual) {
            sq_err += (p - a).powi(2);
            if *a != 0.0 {
                pct_err += ((p - a) / a).abs();
                pct_samples += 1;
            }
        }

        Some(Self {
            samples,
            rmse: (sq_err / samples as f64).sqrt(),
            mape_pct: if pct_samples > 0 {
                pct_err / pct_samples as f64 * 100.0
            } else {
                0.0
            },
        })
    }
}

/// Everything produced by one successful forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub request: ForecastRequest,
    pub history: PriceSeries,
    pub forecast: Forecast,
    pub holdout: Option<HoldoutEvaluation>,
    pub model_name: String,
}
