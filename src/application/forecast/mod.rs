pub mod log_sink;
pub mod prediction_service;

pub use log_sink::PredictionLogger;
pub use prediction_service::{Forecast, PredictionRequest, PredictionService};
