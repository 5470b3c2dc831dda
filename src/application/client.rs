use crate::application::forecast_service::ForecastService;
use crate::domain::errors::ForecastError;
use crate::domain::forecast::{ForecastReport, ForecastRequest};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::error;

pub type ForecastOutcome = Result<ForecastReport, ForecastError>;

/// Unified event type for the User Interface
#[derive(Clone, Debug)]
pub enum ClientEvent {
    Finished(Box<ForecastOutcome>),
    Log(String),
}

/// Bridge between the UI thread and the background runtime.
///
/// At most one forecast runs at a time; its outcome is delivered through
/// `poll_next` on a later frame.
pub struct ForecastClient {
    runtime: Handle,
    service: Arc<ForecastService>,
    outcome_tx: Sender<ForecastOutcome>,
    outcome_rx: Receiver<ForecastOutcome>,
    log_rx: Receiver<String>,
    in_flight: bool,
}

impl ForecastClient {
    pub fn new(runtime: Handle, service: Arc<ForecastService>, log_rx: Receiver<String>) -> Self {
        let (outcome_tx, outcome_rx) = crossbeam_channel::bounded(1);
        Self {
            runtime,
            service,
            outcome_tx,
            outcome_rx,
            log_rx,
            in_flight: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn service(&self) -> &ForecastService {
        &self.service
    }

    /// Start a forecast in the background. Refused while another one is running.
    pub fn submit(&mut self, request: ForecastRequest) -> Result<(), ForecastError> {
        if self.in_flight {
            return Err(ForecastError::invalid("a forecast is already running"));
        }
        request.validate(self.service.settings().max_horizon)?;

        let service = self.service.clone();
        let tx = self.outcome_tx.clone();
        self.in_flight = true;

        self.runtime.spawn(async move {
            let outcome = service.run(&request).await;
            if let Err(e) = &outcome {
                error!("Forecast for {} failed: {}", request.symbol, e);
            }
            let _ = tx.send(outcome);
        });
        Ok(())
    }

    /// Poll for the next available event. Non-blocking; results take priority over logs.
    pub fn poll_next(&mut self) -> Option<ClientEvent> {
        if let Ok(outcome) = self.outcome_rx.try_recv() {
            self.in_flight = false;
            return Some(ClientEvent::Finished(Box::new(outcome)));
        }

        if let Ok(msg) = self.log_rx.try_recv() {
            return Some(ClientEvent::Log(msg));
        }

        None
    }
}
