pub mod sales_csv;

pub use sales_csv::{SalesCsv, read_sales, read_sales_csv};
