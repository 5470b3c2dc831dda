pub mod dense;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use dense::{Activation, DenseLayer, DenseNetwork};
#[cfg(feature = "onnx")]
pub use onnx::OnnxPredictor;

use crate::domain::errors::ModelError;
use crate::domain::ports::Predictor;
use std::path::Path;
use std::sync::Arc;

/// Load the predictor stored at `path`, choosing the backend by extension.
///
/// `window_size` is only needed for ONNX models, whose input width is not
/// read from the file.
#[cfg_attr(not(feature = "onnx"), allow(unused_variables))]
pub fn load_predictor(path: &Path, window_size: usize) -> Result<Arc<dyn Predictor>, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.display().to_string(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(Arc::new(DenseNetwork::load(path)?)),
        #[cfg(feature = "onnx")]
        Some("onnx") => Ok(Arc::new(OnnxPredictor::load(path, window_size)?)),
        _ => Err(ModelError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}
