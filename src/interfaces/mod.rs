pub mod components;
pub mod dashboard;
pub mod design_system;
pub mod view_models;

pub use dashboard::ForecastDashboard;
