// Forecasting core: scaling, windowing and autoregressive rollout
pub mod calendar;
pub mod rollout;
pub mod scaler;
pub mod types;
pub mod window;

pub use calendar::future_dates;
pub use rollout::{rollout, rollout_with};
pub use scaler::MinMaxScaler;
pub use types::{Forecast, ForecastPoint, ForecastReport, ForecastRequest, HoldoutEvaluation};
pub use window::{WINDOW_SIZE, last_window, make_windows};
