// Forecast pipeline orchestration
pub mod forecast_service;

// UI-facing bridge to the background runtime
pub mod client;
