// Forecasting domain
pub mod forecast;

// Market data domain
pub mod market;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
