mod prediction_log_repository;

pub use prediction_log_repository::SqlitePredictionLogRepository;
