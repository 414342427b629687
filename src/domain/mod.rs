// Lag features and model families
pub mod ml;

// Sales series and prediction records
pub mod forecast;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
