//! Autoregressive multi-step forecasting.
//!
//! The predictor only knows how to estimate the next value of a window. A
//! multi-step forecast is obtained by feeding each estimate back in: predict,
//! append to the output, slide the window by one, repeat.

use crate::domain::errors::ForecastError;
use crate::domain::ports::Predictor;
use std::collections::VecDeque;
use tracing::trace;

/// Roll `predictor` forward `n` steps from `seed`.
pub fn rollout(seed: &[f64], n: usize, predictor: &dyn Predictor) -> Result<Vec<f64>, ForecastError> {
    rollout_with(seed, predictor.input_size(), n, |window| {
        predictor.predict(window)
    })
}

/// Roll `predict_fn` forward `n` steps from `seed`.
///
/// Element `i` of the result is the estimate for step `i + 1`. The seed is
/// copied on entry and never modified. Values are not clamped, so they may
/// leave [0, 1] after many steps. The first failing step aborts the whole
/// rollout.
pub fn rollout_with<F>(
    seed: &[f64],
    window_size: usize,
    n: usize,
    mut predict_fn: F,
) -> Result<Vec<f64>, ForecastError>
where
    F: FnMut(&[f64]) -> Result<f64, ForecastError>,
{
    if n == 0 {
        return Err(ForecastError::invalid(
            "number of future predictions must be at least 1",
        ));
    }
    if seed.len() != window_size {
        return Err(ForecastError::invalid(format!(
            "seed window has {} values, predictor expects {}",
            seed.len(),
            window_size
        )));
    }

    let mut window: VecDeque<f64> = seed.iter().copied().collect();
    let mut predictions = Vec::with_capacity(n);

    for step in 0..n {
        let next = predict_fn(window.make_contiguous())?;
        if !next.is_finite() {
            return Err(ForecastError::predictor(format!(
                "non-finite output {} at step {}",
                next,
                step + 1
            )));
        }
        trace!("rollout step {}: {}", step + 1, next);

        predictions.push(next);
        window.pop_front();
        window.push_back(next);
    }

    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_predictor() {
        let out = rollout_with(&[0.75, 1.0], 2, 3, |_| Ok(0.5)).unwrap();
        assert_eq!(out, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_each_step_sees_previous_outputs() {
        let mut seen = Vec::new();
        let out = rollout_with(&[1.0, 2.0, 3.0], 3, 3, |w| {
            seen.push(w.to_vec());
            Ok(w.iter().sum::<f64>())
        })
        .unwrap();

        assert_eq!(out, vec![6.0, 11.0, 20.0]);
        assert_eq!(seen[1], vec![2.0, 3.0, 6.0]);
        assert_eq!(seen[2], vec![3.0, 6.0, 11.0]);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let result = rollout_with(&[0.1], 1, 0, |_| Ok(0.0));
        assert!(matches!(result, Err(ForecastError::InvalidArgument { .. })));
    }

    #[test]
    fn test_seed_length_mismatch_rejected() {
        let result = rollout_with(&[0.1, 0.2], 3, 1, |_| Ok(0.0));
        assert!(matches!(result, Err(ForecastError::InvalidArgument { .. })));
    }

    #[test]
    fn test_failure_aborts_without_partial_result() {
        let mut calls = 0;
        let result = rollout_with(&[0.1, 0.2], 2, 5, |_| {
            calls += 1;
            if calls == 3 {
                Err(ForecastError::predictor("boom"))
            } else {
                Ok(0.3)
            }
        });

        assert_eq!(result, Err(ForecastError::predictor("boom")));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_nan_output_rejected() {
        let result = rollout_with(&[0.1, 0.2], 2, 2, |_| Ok(f64::NAN));
        assert!(matches!(result, Err(ForecastError::Predictor { .. })));
    }

    #[test]
    fn test_drift_outside_unit_range_is_kept() {
        let out = rollout_with(&[0.9, 1.0], 2, 4, |w| Ok(w[1] + 0.1)).unwrap();
        assert!(out.iter().all(|v| *v > 1.0));
        assert!((out[3] - 1.4).abs() < 1e-12);
    }
}
