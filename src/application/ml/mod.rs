pub mod artifact;
pub mod forecast_model;
pub mod gradient_boosting;
pub mod model_registry;
pub mod training;

pub use artifact::ModelArtifact;
pub use forecast_model::ForecastModel;
pub use model_registry::ModelRegistry;
