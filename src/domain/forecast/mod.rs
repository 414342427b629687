pub mod prediction_record;
pub mod sales;

pub use prediction_record::{NewPredictionRecord, PredictionRecord};
pub use sales::{MonthlySales, SaleRecord};
