pub mod core;
pub mod csv_source;
pub mod factory;
pub mod mock;
pub mod model;
pub mod yahoo;

pub use factory::ServiceFactory;
