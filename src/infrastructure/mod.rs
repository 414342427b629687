pub mod data;
pub mod ml;
pub mod observability;
pub mod persistence;
pub mod repositories;

pub use repositories::InMemoryPredictionLogRepository;
