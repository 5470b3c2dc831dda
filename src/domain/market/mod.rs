// Market data domain
pub mod price_series;

pub use price_series::{PricePoint, PriceSeries};
