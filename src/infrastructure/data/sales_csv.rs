//! Reader for retail sales exports (Superstore layout and close variants).
//!
//! Only two columns matter: the order date and the sales amount. Header
//! names are matched loosely; rows that cannot be parsed are dropped and
//! counted rather than failing the whole file.

use crate::domain::forecast::SaleRecord;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

const DATE_COLUMNS: &[&str] = &["order date", "order_date", "orderdate"];
const SALES_COLUMNS: &[&str] = &["sales"];
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%d-%m-%Y", "%m-%d-%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, PartialEq)]
pub struct SalesCsv {
    pub records: Vec<SaleRecord>,
    pub dropped_rows: usize,
}

pub fn read_sales_csv(path: &Path) -> Result<SalesCsv> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let sales = read_sales(BufReader::new(file))
        .with_context(|| format!("Failed to read sales data from {:?}", path))?;
    info!(
        "Loaded {} sales rows from {:?} ({} dropped)",
        sales.records.len(),
        path,
        sales.dropped_rows
    );
    Ok(sales)
}

/// Reads sales rows from any CSV source. Non-UTF-8 bytes (Latin-1 exports)
/// are decoded lossily.
pub fn read_sales<R: Read>(reader: R) -> Result<SalesCsv> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(normalise_header)
        .collect();

    let Some(date_idx) = find_column(&headers, DATE_COLUMNS) else {
        bail!("Missing order date column (expected one of {:?})", DATE_COLUMNS);
    };
    let Some(sales_idx) = find_column(&headers, SALES_COLUMNS) else {
        bail!("Missing sales column");
    };

    let mut records = Vec::new();
    let mut dropped_rows = 0;
    for (line, row) in rdr.byte_records().enumerate() {
        let row = row.with_context(|| format!("Malformed CSV row {}", line + 2))?;
        let date = row.get(date_idx).map(String::from_utf8_lossy);
        let sales = row.get(sales_idx).map(String::from_utf8_lossy);

        match (
            date.as_deref().and_then(parse_order_date),
            sales.as_deref().and_then(parse_sales),
        ) {
            (Some(order_date), Some(sales)) => records.push(SaleRecord { order_date, sales }),
            _ => {
                debug!("Dropping row {}: date={:?} sales={:?}", line + 2, date, sales);
                dropped_rows += 1;
            }
        }
    }

    Ok(SalesCsv {
        records,
        dropped_rows,
    })
}

fn normalise_header(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_start_matches('\u{feff}')
        .replace(['\n', '\r'], " ")
        .trim()
        .to_lowercase()
}

fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| candidates.iter().any(|c| h == c))
}

/// Parses the date part of a cell; a trailing time component is ignored.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn parse_sales(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
