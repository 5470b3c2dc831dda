use crate::config::{Config, DataSource};
use crate::domain::errors::ModelError;
use crate::domain::ports::{MarketDataService, Predictor};
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::csv_source::CsvMarketDataService;
use crate::infrastructure::mock::MockMarketDataService;
use crate::infrastructure::model::load_predictor;
use crate::infrastructure::yahoo::YahooMarketDataService;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_market_data_service(config: &Config) -> Result<Arc<dyn MarketDataService>> {
        let service: Arc<dyn MarketDataService> = match config.market_data.source {
            DataSource::Yahoo => {
                let client = HttpClientFactory::create_client(
                    config.http_timeout(),
                    config.http_connect_timeout(),
                );
                Arc::new(YahooMarketDataService::new(
                    client,
                    config.market_data.yahoo_base_url.clone(),
                ))
            }
            DataSource::Csv => {
                let path = config
                    .market_data
                    .csv_path
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("CSV data source selected without CSV_PATH"))?;
                Arc::new(CsvMarketDataService::new(path))
            }
            DataSource::Mock => {
                // Demo data: a year of synthetic closes for the default symbol
                let start = NaiveDate::from_ymd_opt(2022, 9, 1).unwrap_or_default();
                Arc::new(MockMarketDataService::new().with_series(
                    MockMarketDataService::synthetic_series(
                        &config.dashboard.default_symbol,
                        start,
                        430,
                    ),
                ))
            }
        };

        info!("Market data source: {}", service.name());
        Ok(service)
    }

    pub fn create_predictor(config: &Config) -> Result<Arc<dyn Predictor>, ModelError> {
        let predictor = load_predictor(&config.model.model_path, config.model.window_size)?;
        info!(
            "Predictor ready: {} ({} inputs)",
            predictor.name(),
            predictor.input_size()
        );
        Ok(predictor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source() {
        let mut config = Config::default();
        config.market_data.source = DataSource::Mock;

        let service = ServiceFactory::create_market_data_service(&config).unwrap();
        assert_eq!(service.name(), "Mock");
    }

    #[test]
    fn test_csv_source_without_path() {
        let mut config = Config::default();
        config.market_data.source = DataSource::Csv;

        assert!(ServiceFactory::create_market_data_service(&config).is_err());
    }

    #[test]
    fn test_missing_model() {
        let mut config = Config::default();
        config.model.model_path = "no/such/model.json".into();

        assert!(matches!(
            ServiceFactory::create_predictor(&config),
            Err(ModelError::NotFound { .. })
        ));
    }
}
