use crate::domain::errors::ForecastError;

/// Min-max scaler mapping a series onto [0, 1].
///
/// The bounds are captured by `fit_transform` and reused by
/// `inverse_transform`, so one instance covers one scaling session.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler {
    bounds: Option<(f64, f64)>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(&self) -> Option<f64> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<f64> {
        self.bounds.map(|(_, max)| max)
    }

    pub fn is_fitted(&self) -> bool {
        self.bounds.is_some()
    }

    /// Fit the bounds on `series` and return the scaled copy.
    pub fn fit_transform(&mut self, series: &[f64]) -> Result<Vec<f64>, ForecastError> {
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });

        if max == min {
            return Err(ForecastError::DegenerateRange { value: min });
        }

        self.bounds = Some((min, max));
        let range = max - min;

        Ok(series.iter().map(|x| (x - min) / range).collect())
    }

    /// Map scaled values back to the units of the fitted series.
    pub fn inverse_transform(&self, values: &[f64]) -> Result<Vec<f64>, ForecastError> {
        let (min, max) = self.bounds.ok_or(ForecastError::NotFitted)?;
        let range = max - min;

        Ok(values.iter().map(|v| v * range + min).collect())
    }
}
