// Forecast models, registry and offline training
pub mod ml;

// Prediction service and log dispatch
pub mod forecast;
