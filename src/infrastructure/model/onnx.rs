use crate::domain::errors::{ForecastError, ModelError};
use crate::domain::ports::Predictor;
use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Feed-forward model exported to ONNX (input `[1, window]`, output `[1, 1]`).
pub struct OnnxPredictor {
    session: Mutex<Session>,
    model_path: PathBuf,
    input_size: usize,
}

impl OnnxPredictor {
    pub fn load(model_path: &Path, input_size: usize) -> Result<Self, ModelError> {
        let session = Session::builder()
            .and_then(|builder| builder.with_intra_threads(1))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| ModelError::Runtime {
                reason: format!("failed to load {:?}: {}", model_path, e),
            })?;

        info!("Successfully loaded ONNX model from {:?}", model_path);

        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
            input_size,
        })
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.len() != self.input_size {
            return Err(ForecastError::predictor(format!(
                "input has {} values, model expects {}",
                window.len(),
                self.input_size
            )));
        }

        let mut session = self
            .session
            .lock()
            .map_err(|e| ForecastError::predictor(format!("session lock poisoned: {}", e)))?;

        let data: Vec<f32> = window.iter().map(|v| *v as f32).collect();
        let shape = vec![1, self.input_size];
        let input_value = ort::value::Value::from_array((shape.as_slice(), data))
            .map_err(|e| ForecastError::predictor(format!("input tensor creation failed: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| ForecastError::predictor(e.to_string()))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| ForecastError::predictor("no output found"))?;
        let (_, values) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| ForecastError::predictor(e.to_string()))?;

        let next = values
            .iter()
            .next()
            .copied()
            .ok_or_else(|| ForecastError::predictor("empty output"))?;

        debug!("{:?} -> {}", self.model_path.file_name(), next);
        Ok(next as f64)
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn name(&self) -> &str {
        "ONNX Runtime (FNN)"
    }
}
