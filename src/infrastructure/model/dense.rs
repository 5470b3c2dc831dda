//! Native feed-forward network evaluated with ndarray.
//!
//! Weights are exported from the training notebook as JSON:
//!
//! ```json
//! { "layers": [ { "weights": [[...], ...], "biases": [...], "activation": "relu" } ] }
//! ```
//!
//! `weights` is `output × input` (one row per neuron). Dropout layers used
//! during training have no inference-time effect and are not exported.

use crate::domain::errors::{ForecastError, ModelError};
use crate::domain::ports::Predictor;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LayerFile {
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
    #[serde(default = "default_activation")]
    activation: Activation,
}

fn default_activation() -> Activation {
    Activation::Linear
}

#[derive(Debug, Deserialize)]
struct NetworkFile {
    #[serde(default)]
    name: Option<String>,
    layers: Vec<LayerFile>,
}

/// A fully connected layer
#[derive(Debug, Clone)]
pub struct DenseLayer {
    weights: Array2<f64>,
    biases: Array1<f64>,
    activation: Activation,
}

impl DenseLayer {
    pub fn new(
        weights: Array2<f64>,
        biases: Array1<f64>,
        activation: Activation,
    ) -> Result<Self, ModelError> {
        if weights.nrows() == 0 || weights.ncols() == 0 {
            return Err(ModelError::InvalidShape {
                reason: "layer has no weights".to_string(),
            });
        }
        if biases.len() != weights.nrows() {
            return Err(ModelError::InvalidShape {
                reason: format!(
                    "{} biases for {} neurons",
                    biases.len(),
                    weights.nrows()
                ),
            });
        }
        if weights.iter().chain(biases.iter()).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidShape {
                reason: "non-finite parameter".to_string(),
            });
        }

        Ok(Self {
            weights,
            biases,
            activation,
        })
    }

    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn forward(&self, input: &Array1<f64>) -> Array1<f64> {
        let z = self.weights.dot(input) + &self.biases;
        z.mapv(|x| self.activation.apply(x))
    }

    fn from_file(index: usize, layer: LayerFile) -> Result<Self, ModelError> {
        let rows = layer.weights.len();
        let cols = layer.weights.first().map(Vec::len).unwrap_or(0);
        if layer.weights.iter().any(|row| row.len() != cols) {
            return Err(ModelError::InvalidShape {
                reason: format!("layer {} has ragged weight rows", index),
            });
        }

        let flat: Vec<f64> = layer.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((rows, cols), flat).map_err(|e| {
            ModelError::InvalidShape {
                reason: format!("layer {}: {}", index, e),
            }
        })?;

        Self::new(weights, Array1::from(layer.biases), layer.activation).map_err(|e| match e {
            ModelError::InvalidShape { reason } => ModelError::InvalidShape {
                reason: format!("layer {}: {}", index, reason),
            },
            other => other,
        })
    }
}

/// Stack of dense layers producing a single scalar.
#[derive(Debug, Clone)]
pub struct DenseNetwork {
    name: String,
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub fn new(name: impl Into<String>, layers: Vec<DenseLayer>) -> Result<Self, ModelError> {
        let Some(last) = layers.last() else {
            return Err(ModelError::InvalidShape {
                reason: "network has no layers".to_string(),
            });
        };
        if last.output_size() != 1 {
            return Err(ModelError::InvalidShape {
                reason: format!("final layer has {} outputs, expected 1", last.output_size()),
            });
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(ModelError::InvalidShape {
                    reason: format!(
                        "layer {} outputs {} values but layer {} expects {}",
                        i,
                        pair[0].output_size(),
                        i + 1,
                        pair[1].input_size()
                    ),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            layers,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let file: NetworkFile = serde_json::from_str(json).map_err(|e| ModelError::Parse {
            reason: e.to_string(),
        })?;

        let layers = file
            .layers
            .into_iter()
            .enumerate()
            .map(|(i, layer)| DenseLayer::from_file(i, layer))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(
            file.name.unwrap_or_else(|| "Dense FNN".to_string()),
            layers,
        )
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path).map_err(|e| ModelError::Parse {
            reason: format!("{}: {}", path.display(), e),
        })?;
        let network = Self::from_json_str(&json)?;

        info!(
            "Loaded dense network '{}' from {:?} ({} layers, {} inputs)",
            network.name,
            path,
            network.layers.len(),
            network.input_size()
        );
        Ok(network)
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }
}

impl Predictor for DenseNetwork {
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.len() != self.input_size() {
            return Err(ForecastError::predictor(format!(
                "input has {} values, network expects {}",
                window.len(),
                self.input_size()
            )));
        }

        let output = self
            .layers
            .iter()
            .fold(Array1::from(window.to_vec()), |x, layer| layer.forward(&x));

        output
            .first()
            .copied()
            .ok_or_else(|| ForecastError::predictor("network produced no output"))
    }

    fn input_size(&self) -> usize {
        self.layers.first().map(DenseLayer::input_size).unwrap_or(0)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const TINY: &str = r#"{
        "name": "tiny",
        "layers": [
            { "weights": [[1.0, 0.0], [0.0, -1.0]], "biases": [0.0, 0.0], "activation": "relu" },
            { "weights": [[2.0, 3.0]], "biases": [0.5] }
        ]
    }"#;

    #[test]
    fn test_forward_pass() {
        let net = DenseNetwork::from_json_str(TINY).unwrap();

        assert_eq!(net.input_size(), 2);
        assert_eq!(net.name(), "tiny");
        // relu([0.4, -0.2]) = [0.4, 0.0] -> 2*0.4 + 0.5
        assert!((net.predict(&[0.4, 0.2]).unwrap() - 1.3).abs() < 1e-12);
        // relu([0.0, 0.3]) = [0.0, 0.3] -> 3*0.3 + 0.5
        assert!((net.predict(&[0.0, -0.3]).unwrap() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let net = DenseNetwork::from_json_str(TINY).unwrap();
        let a = net.predict(&[0.7, 0.1]).unwrap();
        let b = net.predict(&[0.7, 0.1]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_input_length() {
        let net = DenseNetwork::from_json_str(TINY).unwrap();
        assert!(matches!(
            net.predict(&[0.1, 0.2, 0.3]),
            Err(ForecastError::Predictor { .. })
        ));
    }

    #[test]
    fn test_mismatched_layers_rejected() {
        let json = r#"{ "layers": [
            { "weights": [[1.0, 1.0]], "biases": [0.0] },
            { "weights": [[1.0, 1.0]], "biases": [0.0] }
        ] }"#;

        assert!(matches!(
            DenseNetwork::from_json_str(json),
            Err(ModelError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_multi_output_rejected() {
        let json = r#"{ "layers": [ { "weights": [[1.0], [2.0]], "biases": [0.0, 0.0] } ] }"#;
        assert!(DenseNetwork::from_json_str(json).is_err());
    }

    #[test]
    fn test_bias_count_checked() {
        let result = DenseLayer::new(array![[1.0, 2.0]], array![0.0, 0.0], Activation::Linear);
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_json() {
        assert!(matches!(
            DenseNetwork::from_json_str("not json"),
            Err(ModelError::Parse { .. })
        ));
    }

    #[test]
    fn test_activations() {
        assert_eq!(Activation::Relu.apply(-1.0), 0.0);
        assert_eq!(Activation::Linear.apply(-1.0), -1.0);
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-12);
        assert_eq!(Activation::Tanh.apply(0.0), 0.0);
    }
}
