use chrono::NaiveDate;

/// One order line of the raw sales export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleRecord {
    pub order_date: NaiveDate,
    pub sales: f64,
}

/// Aggregate sales of one calendar month, keyed by the first day of the month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySales {
    pub month: NaiveDate,
    pub sales: f64,
}
