//! Predictor and pipeline configuration parsing from environment variables.

use crate::domain::forecast::WINDOW_SIZE;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_path: PathBuf,
    pub window_size: usize,
    /// Share of the history treated as training data; the rest is held out
    pub train_split: f64,
    pub evaluate_holdout: bool,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/future_fnn_model.json"),
            window_size: WINDOW_SIZE,
            train_split: 0.8,
            evaluate_holdout: true,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let window_size = env::var("WINDOW_SIZE")
            .unwrap_or_else(|_| defaults.window_size.to_string())
            .parse::<usize>()
            .context("Failed to parse WINDOW_SIZE")?;
        if window_size == 0 {
            anyhow::bail!("WINDOW_SIZE must be at least 1");
        }

        let train_split = env::var("TRAIN_SPLIT")
            .unwrap_or_else(|_| defaults.train_split.to_string())
            .parse::<f64>()
            .context("Failed to parse TRAIN_SPLIT")?;
        if !(train_split > 0.0 && train_split <= 1.0) {
            anyhow::bail!("TRAIN_SPLIT must be in (0, 1], got {}", train_split);
        }

        Ok(Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            window_size,
            train_split,
            evaluate_holdout: env::var("EVALUATE_HOLDOUT")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .context("Failed to parse EVALUATE_HOLDOUT")?,
        })
    }
}
