use thiserror::Error;

/// Errors raised while turning a price history into a forecast
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    #[error("No historical data returned")]
    EmptyData,

    #[error("Insufficient data: need at least {required} points, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Degenerate price range: every value equals {value}")]
    DegenerateRange { value: f64 },

    #[error("Scaler used before fit_transform")]
    NotFitted,

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Prediction failed: {reason}")]
    Predictor { reason: String },

    #[error("Historical data fetch failed: {0}")]
    UpstreamFetch(#[from] MarketDataError),
}

impl ForecastError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ForecastError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn predictor(reason: impl Into<String>) -> Self {
        ForecastError::Predictor {
            reason: reason.into(),
        }
    }

    /// Text shown to the dashboard user in place of the results.
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::EmptyData => "Insufficient data for predictions. Please select a different date range or stock symbol.".to_string(),
            ForecastError::InsufficientData { required, available } => format!(
                "Only {} trading days in the selected range, at least {} are needed. Please select a longer date range.",
                available, required
            ),
            ForecastError::DegenerateRange { .. } => {
                "The closing price never changes in the selected range, so it cannot be scaled. Please select a different date range or stock symbol.".to_string()
            }
            ForecastError::UpstreamFetch(e) => {
                format!("Could not download historical data: {}", e)
            }
            other => other.to_string(),
        }
    }
}

/// Errors related to historical market data retrieval
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarketDataError {
    #[error("Request failed: {reason}")]
    Request { reason: String },

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream error {code}: {description}")]
    Upstream { code: String, description: String },

    #[error("Malformed market data: {reason}")]
    Malformed { reason: String },

    #[error("I/O error: {reason}")]
    Io { reason: String },
}

/// Errors related to loading predictor weights
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model file not found: {path}")]
    NotFound { path: String },

    #[error("Unsupported model format: {path} (expected .json or .onnx)")]
    UnsupportedFormat { path: String },

    #[error("Failed to parse model: {reason}")]
    Parse { reason: String },

    #[error("Invalid model shape: {reason}")]
    InvalidShape { reason: String },

    #[error("Model runtime error: {reason}")]
    Runtime { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_formatting() {
        let error = ForecastError::InsufficientData {
            required: 61,
            available: 12,
        };

        let msg = error.to_string();
        assert!(msg.contains("61"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_empty_data_user_message() {
        let msg = ForecastError::EmptyData.user_message();
        assert!(msg.starts_with("Insufficient data for predictions"));
    }

    #[test]
    fn test_upstream_error_converts() {
        let upstream = MarketDataError::Upstream {
            code: "Not Found".to_string(),
            description: "No data found, symbol may be delisted".to_string(),
        };
        let error: ForecastError = upstream.into();

        assert!(matches!(error, ForecastError::UpstreamFetch(_)));
        assert!(error.user_message().contains("symbol may be delisted"));
    }
}
