use chrono::NaiveDate;
use std::sync::Arc;
use stockcast::application::forecast_service::{ForecastService, ForecastSettings};
use stockcast::domain::errors::{ForecastError, MarketDataError};
use stockcast::domain::forecast::ForecastRequest;
use stockcast::domain::market::{PricePoint, PriceSeries};
use stockcast::domain::ports::{MarketDataService, Predictor};
use stockcast::infrastructure::csv_source::CsvMarketDataService;
use stockcast::infrastructure::mock::MockMarketDataService;
use stockcast::infrastructure::model::dense::DenseNetwork;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

struct Fixed(f64);

impl Predictor for Fixed {
    fn predict(&self, _window: &[f64]) -> Result<f64, ForecastError> {
        Ok(self.0)
    }
    fn input_size(&self) -> usize {
        60
    }
    fn name(&self) -> &str {
        "fixed"
    }
}

/// Fails once the window contains a previous prediction
struct FailsOnFeedback;

impl Predictor for FailsOnFeedback {
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.contains(&-1.0) {
            return Err(ForecastError::predictor("saw its own output"));
        }
        Ok(-1.0)
    }
    fn input_size(&self) -> usize {
        60
    }
    fn name(&self) -> &str {
        "fails on feedback"
    }
}

/// History ending on 2023-11-03, the default dashboard end date
fn history_to_nov_3() -> PriceSeries {
    let start = date(2022, 9, 1);
    let days = (date(2023, 11, 3) - start).num_days() as usize + 1;
    MockMarketDataService::synthetic_series("AAPL", start, days)
}

fn service(market: MockMarketDataService, predictor: impl Predictor + 'static) -> ForecastService {
    ForecastService::new(
        Arc::new(market),
        Arc::new(predictor),
        ForecastSettings::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_forecast_dates_start_after_last_close() {
    init_logging();
    let svc = service(
        MockMarketDataService::new().with_series(history_to_nov_3()),
        Fixed(0.5),
    );

    let report = svc
        .run(&ForecastRequest::new(
            "AAPL",
            date(2022, 9, 1),
            date(2023, 11, 4),
            5,
        ))
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = report.forecast.points.iter().map(|p| p.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2023, 11, 4),
            date(2023, 11, 5),
            date(2023, 11, 6),
            date(2023, 11, 7),
            date(2023, 11, 8),
        ]
    );
    assert_eq!(report.history.last_date(), Some(date(2023, 11, 3)));

    // 0.5 in scaled space is the midpoint of the observed range
    let closes = report.history.closes();
    let lo = closes.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    for price in report.forecast.prices() {
        assert!((price - (lo + hi) / 2.0).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_end_date_is_exclusive() {
    let svc = service(
        MockMarketDataService::new().with_series(history_to_nov_3()),
        Fixed(0.5),
    );

    let report = svc
        .run(&ForecastRequest::new(
            "AAPL",
            date(2022, 9, 1),
            date(2023, 11, 3),
            1,
        ))
        .await
        .unwrap();

    assert_eq!(report.history.last_date(), Some(date(2023, 11, 2)));
    assert_eq!(report.forecast.points[0].date, date(2023, 11, 3));
}

#[tokio::test]
async fn test_unknown_symbol_yields_empty_data() {
    init_logging();
    let svc = service(
        MockMarketDataService::new().with_series(history_to_nov_3()),
        Fixed(0.5),
    );

    let result = svc
        .run(&ForecastRequest::new(
            "ZZZZ",
            date(2022, 9, 1),
            date(2023, 11, 4),
            5,
        ))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err, ForecastError::EmptyData);
    assert!(err.user_message().starts_with("Insufficient data for predictions"));
}

#[tokio::test]
async fn test_range_without_trading_days() {
    let svc = service(
        MockMarketDataService::new().with_series(history_to_nov_3()),
        Fixed(0.5),
    );

    let result = svc
        .run(&ForecastRequest::new(
            "AAPL",
            date(2024, 1, 1),
            date(2024, 2, 1),
            5,
        ))
        .await;

    assert_eq!(result, Err(ForecastError::EmptyData));
}

#[tokio::test]
async fn test_flat_prices_are_rejected() {
    let points = date(2023, 1, 1)
        .iter_days()
        .take(90)
        .map(|date| PricePoint { date, close: 42.0 })
        .collect();
    let flat = PriceSeries::new("FLAT", points).unwrap();
    let svc = service(MockMarketDataService::new().with_series(flat), Fixed(0.5));

    let result = svc
        .run(&ForecastRequest::new(
            "FLAT",
            date(2023, 1, 1),
            date(2024, 1, 1),
            3,
        ))
        .await;

    assert_eq!(result, Err(ForecastError::DegenerateRange { value: 42.0 }));
}

#[tokio::test]
async fn test_upstream_failure_is_propagated() {
    let market = MockMarketDataService::new().with_series(history_to_nov_3());
    market.fail_with(MarketDataError::Status {
        status: 503,
        body: "unavailable".to_string(),
    });
    let svc = service(market, Fixed(0.5));

    let result = svc
        .run(&ForecastRequest::new(
            "AAPL",
            date(2022, 9, 1),
            date(2023, 11, 4),
            5,
        ))
        .await;

    assert!(matches!(
        result,
        Err(ForecastError::UpstreamFetch(MarketDataError::Status { status: 503, .. }))
    ));
}

#[tokio::test]
async fn test_forecast_outside_observed_range_is_kept() {
    let series = history_to_nov_3();
    let hi = series
        .closes()
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);
    let svc = service(MockMarketDataService::new().with_series(series), Fixed(1.5));

    let report = svc
        .run(&ForecastRequest::new(
            "AAPL",
            date(2022, 9, 1),
            date(2023, 11, 4),
            3,
        ))
        .await
        .unwrap();

    assert!(report.forecast.prices().iter().all(|p| *p > hi));
}

#[tokio::test]
async fn test_predictor_error_aborts_without_partial_result() {
    let svc = service(
        MockMarketDataService::new().with_series(history_to_nov_3()),
        FailsOnFeedback,
    );
    let request = ForecastRequest::new("AAPL", date(2022, 9, 1), date(2023, 11, 4), 5);

    // Holdout windows never contain -1.0, so the failure comes from the rollout
    let result = svc.run(&request).await;
    assert!(matches!(result, Err(ForecastError::Predictor { .. })));
}

#[tokio::test]
async fn test_horizon_bounds() {
    let svc = service(
        MockMarketDataService::new().with_series(history_to_nov_3()),
        Fixed(0.5),
    );

    for horizon in [0, 366] {
        let result = svc
            .run(&ForecastRequest::new(
                "AAPL",
                date(2022, 9, 1),
                date(2023, 11, 4),
                horizon,
            ))
            .await;
        assert!(matches!(result, Err(ForecastError::InvalidArgument { .. })));
    }
}

#[tokio::test]
async fn test_csv_source_with_dense_network() {
    init_logging();

    // Weights of 1/60 on every input: a moving average of the window
    let weights = vec![1.0 / 60.0; 60];
    let model = serde_json::json!({
        "name": "moving average",
        "layers": [ { "weights": [weights], "biases": [0.0], "activation": "linear" } ]
    });
    let network = DenseNetwork::from_json_str(&model.to_string()).unwrap();

    let mut csv = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for (i, day) in date(2023, 1, 2).iter_days().take(120).enumerate() {
        let close = 100.0 + (i % 10) as f64;
        csv.push_str(&format!("{},0,0,0,{},{},1000\n", day, close, close));
    }
    let path = std::env::temp_dir().join(format!("stockcast_pipeline_{}.csv", std::process::id()));
    std::fs::write(&path, csv).unwrap();

    let market = CsvMarketDataService::new(path.clone());
    assert_eq!(market.name(), "CSV file");
    let svc = ForecastService::new(
        Arc::new(market),
        Arc::new(network),
        ForecastSettings::default(),
    )
    .unwrap();

    let report = svc
        .run(&ForecastRequest::new(
            "test",
            date(2023, 1, 1),
            date(2024, 1, 1),
            4,
        ))
        .await;
    std::fs::remove_file(&path).ok();

    let report = report.unwrap();
    assert_eq!(report.request.symbol, "TEST");
    assert_eq!(report.forecast.len(), 4);
    // Averages of closes in [100, 109] stay inside that range
    for price in report.forecast.prices() {
        assert!((100.0..=109.0).contains(&price), "{}", price);
    }
    let holdout = report.holdout.unwrap();
    assert!(holdout.rmse > 0.0);
}

#[test]
fn test_service_runs_on_current_thread_runtime() {
    let svc = service(
        MockMarketDataService::new().with_series(history_to_nov_3()),
        Fixed(0.25),
    );

    let report = tokio_test::block_on(svc.run(&ForecastRequest::new(
        "aapl",
        date(2023, 6, 1),
        date(2023, 11, 4),
        2,
    )))
    .unwrap();

    assert_eq!(report.forecast.len(), 2);
    assert_eq!(report.model_name, "fixed");
}
