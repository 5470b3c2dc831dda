//! Forecast pipeline: fetch → scale → window → rollout → inverse-scale.

use crate::domain::errors::ForecastError;
use crate::domain::forecast::{
    Forecast, ForecastReport, ForecastRequest, HoldoutEvaluation, MinMaxScaler, WINDOW_SIZE,
    future_dates, last_window, make_windows, rollout,
};
use crate::domain::ports::{MarketDataService, Predictor};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSettings {
    pub window_size: usize,
    pub train_split: f64,
    pub evaluate_holdout: bool,
    pub max_horizon: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            train_split: 0.8,
            evaluate_holdout: true,
            max_horizon: 365,
        }
    }
}

/// Runs one forecast request end to end.
///
/// The predictor is shared read-only across requests; all other state is
/// rebuilt per request.
pub struct ForecastService {
    market_data: Arc<dyn MarketDataService>,
    predictor: Arc<dyn Predictor>,
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(
        market_data: Arc<dyn MarketDataService>,
        predictor: Arc<dyn Predictor>,
        settings: ForecastSettings,
    ) -> Result<Self, ForecastError> {
        if predictor.input_size() != settings.window_size {
            return Err(ForecastError::invalid(format!(
                "model '{}' expects {} inputs but the window size is {}",
                predictor.name(),
                predictor.input_size(),
                settings.window_size
            )));
        }
        if !(settings.train_split > 0.0 && settings.train_split <= 1.0) {
            return Err(ForecastError::invalid(format!(
                "train split must be in (0, 1], got {}",
                settings.train_split
            )));
        }

        Ok(Self {
            market_data,
            predictor,
            settings,
        })
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    pub fn model_name(&self) -> &str {
        self.predictor.name()
    }

    pub fn source_name(&self) -> &str {
        self.market_data.name()
    }

    pub async fn run(&self, request: &ForecastRequest) -> Result<ForecastReport, ForecastError> {
        request.validate(self.settings.max_horizon)?;
        let window_size = self.settings.window_size;

        info!(
            "Forecast requested: {} [{} -> {}), {} steps via {}",
            request.symbol,
            request.start,
            request.end,
            request.horizon,
            self.market_data.name()
        );

        let history = self
            .market_data
            .get_daily_closes(&request.symbol, request.start, request.end)
            .await
            .inspect_err(|e| warn!("Fetch failed for {}: {}", request.symbol, e))?;

        let Some(last_date) = history.last_date() else {
            warn!("No historical data for {}", request.symbol);
            return Err(ForecastError::EmptyData);
        };
        if history.len() <= window_size {
            return Err(ForecastError::InsufficientData {
                required: window_size + 1,
                available: history.len(),
            });
        }

        let closes = history.closes();
        let mut scaler = MinMaxScaler::new();
        let scaled = scaler.fit_transform(&closes)?;

        let training_len = (closes.len() as f64 * self.settings.train_split).ceil() as usize;
        // The test partition always keeps one full window plus one target
        let test_start = training_len
            .saturating_sub(window_size)
            .min(closes.len() - window_size - 1);
        let test_data = &scaled[test_start..];
        debug!(
            "{} closes, training {}, test partition {} (from index {})",
            closes.len(),
            training_len,
            test_data.len(),
            test_start
        );

        let seed = last_window(test_data, window_size)?;
        let raw = rollout(seed, request.horizon, self.predictor.as_ref())?;
        let prices = scaler.inverse_transform(&raw)?;
        let forecast = Forecast::from_parts(future_dates(last_date, request.horizon), prices)?;

        let holdout = if self.settings.evaluate_holdout {
            self.evaluate_holdout(test_data, &scaler)?
        } else {
            None
        };

        info!(
            "Forecast for {} ready: {} predictions from {} to {}",
            request.symbol,
            forecast.len(),
            forecast.points.first().map(|p| p.date.to_string()).unwrap_or_default(),
            forecast.points.last().map(|p| p.date.to_string()).unwrap_or_default()
        );

        Ok(ForecastReport {
            request: request.clone(),
            history,
            forecast,
            holdout,
            model_name: self.predictor.name().to_string(),
        })
    }

    /// One-step-ahead error of the model on every window of the test partition.
    fn evaluate_holdout(
        &self,
        test_data: &[f64],
        scaler: &MinMaxScaler,
    ) -> Result<Option<HoldoutEvaluation>, ForecastError> {
        let window_size = self.settings.window_size;
        let windows = make_windows(test_data, window_size)?;

        let predicted = windows
            .iter()
            .map(|w| self.predictor.predict(w))
            .collect::<Result<Vec<_>, _>>()?;
        let actual = &test_data[window_size..];

        let evaluation = HoldoutEvaluation::from_pairs(
            &scaler.inverse_transform(&predicted)?,
            &scaler.inverse_transform(actual)?,
        );
        if let Some(eval) = &evaluation {
            info!(
                "Holdout: {} samples, RMSE {:.4}, MAPE {:.2}%",
                eval.samples, eval.rmse, eval.mape_pct
            );
        }
        Ok(evaluation)
    }
}
