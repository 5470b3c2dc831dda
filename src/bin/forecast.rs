//! Headless forecast runner
//!
//! Runs the same pipeline as the dashboard and prints the predictions to stdout.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use stockcast::application::forecast_service::ForecastService;
use stockcast::config::{Config, DataSource};
use stockcast::domain::forecast::{ForecastReport, ForecastRequest};
use stockcast::infrastructure::ServiceFactory;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Forecast future daily closes for one stock", long_about = None)]
struct Cli {
    /// Stock symbol (defaults to DEFAULT_SYMBOL)
    #[arg(short, long)]
    symbol: Option<String>,

    /// Start of the history window (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End of the history window, exclusive (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Number of future predictions
    #[arg(short = 'n', long)]
    horizon: Option<usize>,

    /// Model weights (.json dense network or .onnx)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Data source: yahoo, csv or mock
    #[arg(long)]
    source: Option<DataSource>,

    /// CSV file with Date and Close columns (implies --source csv)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(path) = cli.model {
        config.model.model_path = path;
    }
    if let Some(path) = cli.csv {
        config.market_data.csv_path = Some(path);
        config.market_data.source = DataSource::Csv;
    }
    if let Some(source) = cli.source {
        config.market_data.source = source;
    }

    let request = ForecastRequest::new(
        cli.symbol
            .unwrap_or_else(|| config.dashboard.default_symbol.clone()),
        cli.start.unwrap_or(config.dashboard.default_start),
        cli.end.unwrap_or(config.dashboard.default_end),
        cli.horizon.unwrap_or(config.dashboard.default_horizon),
    );

    let market_data = ServiceFactory::create_market_data_service(&config)?;
    let predictor =
        ServiceFactory::create_predictor(&config).context("Failed to load forecasting model")?;
    let service = ForecastService::new(market_data, predictor, config.forecast_settings())
        .context("Model and forecast settings are incompatible")?;

    let report = service
        .run(&request)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    info!("Done: {} predictions", report.forecast.len());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ForecastReport) {
    println!(
        "{} | history {} rows ({} .. {}) | model {}",
        report.request.symbol,
        report.history.len(),
        report
            .history
            .first_date()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        report
            .history
            .last_date()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        report.model_name
    );
    println!("{}", "=".repeat(40));
    println!("{:<12} {:>16}", "Date", "Predicted Close");
    println!("{}", "-".repeat(40));
    for p in &report.forecast.points {
        println!("{:<12} {:>16.2}", p.date, p.price);
    }

    if let Some(eval) = &report.holdout {
        println!("{}", "-".repeat(40));
        println!(
            "Holdout: {} windows, RMSE {:.2}, MAPE {:.2}%",
            eval.samples, eval.rmse, eval.mape_pct
        );
    }
}
