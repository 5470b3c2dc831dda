use anyhow::Context;
use std::sync::Arc;
use stockcast::application::client::ForecastClient;
use stockcast::application::forecast_service::ForecastService;
use stockcast::config::Config;
use stockcast::infrastructure::ServiceFactory;
use stockcast::interfaces::ForecastDashboard;
use stockcast::interfaces::view_models::SettingsForm;

use tracing::{Level, info};
use tracing_subscriber::prelude::*;

// Sends formatted log lines to the dashboard's log panel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).trim_end().to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Starting Stockcast v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;
    let market_data = ServiceFactory::create_market_data_service(&config)?;
    let predictor =
        ServiceFactory::create_predictor(&config).context("Failed to load forecasting model")?;
    let service = ForecastService::new(market_data, predictor, config.forecast_settings())
        .context("Model and forecast settings are incompatible")?;

    // Requests run here while eframe owns the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    let client = ForecastClient::new(runtime.handle().clone(), Arc::new(service), log_rx);
    let dashboard = ForecastDashboard::new(client, SettingsForm::from_config(&config.dashboard));

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Stock Price Prediction"),
        ..Default::default()
    };

    eframe::run_native(
        "Stockcast",
        native_options,
        Box::new(|_cc| Ok(Box::new(dashboard))),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}
