//! Flat-file dataset adapter.
//!
//! Loads an online-retail style CSV (header + one transaction per line),
//! filters it to a single product, and drops rows the simulation cannot use:
//! non-positive price or quantity, unparseable timestamps.  The core never
//! sees those rows; failures surface unmodified as [`Error::Dataset`].
//!
//! Column positions are resolved from the header, so reordered exports work.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{Error, Observation};

const COL_STOCK_CODE: &str = "StockCode";
const COL_QUANTITY: &str = "Quantity";
const COL_PRICE: &str = "Price";
const COL_DATE: &str = "InvoiceDate";

/// Split one CSV line, honoring double-quoted fields (descriptions contain
/// commas in the retail export).
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(ch),
        }
    }
    fields.push(cur);
    fields
}

fn month_of(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(chrono::Datelike::month(&dt.date()));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(chrono::Datelike::month(&d));
    }
    None
}

fn column(header: &[String], name: &str) -> Result<usize, Error> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| Error::Dataset(format!("missing column {name:?}")))
}

/// Load the rows for `stock_code` from the CSV at `path`.
///
/// Rows with missing fields, non-positive price/quantity, or unparseable
/// timestamps are silently excluded, mirroring the upstream cleaning the
/// core contract assumes.  The result may be empty; `MarketHistory::new`
/// rejects that downstream.
pub fn load_observations(path: &Path, stock_code: &str) -> Result<Vec<Observation>, Error> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Dataset(format!("{}: {e}", path.display())))?;
    parse_observations(&text, stock_code)
}

/// Parse CSV text already in memory.  Split out for testability.
pub fn parse_observations(text: &str, stock_code: &str) -> Result<Vec<Observation>, Error> {
    let mut lines = text.lines();
    let header = split_line(
        lines
            .next()
            .ok_or_else(|| Error::Dataset("empty dataset".into()))?,
    );
    let code_col = column(&header, COL_STOCK_CODE)?;
    let qty_col = column(&header, COL_QUANTITY)?;
    let price_col = column(&header, COL_PRICE)?;
    let date_col = column(&header, COL_DATE)?;

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_line(line);
        let Some(code) = fields.get(code_col) else {
            continue;
        };
        if code.trim() != stock_code {
            continue;
        }
        let quantity = fields
            .get(qty_col)
            .and_then(|f| f.trim().parse::<i64>().ok());
        let price = fields
            .get(price_col)
            .and_then(|f| f.trim().parse::<f64>().ok());
        let month = fields.get(date_col).and_then(|f| month_of(f));
        let (Some(quantity), Some(price), Some(month)) = (quantity, price, month) else {
            continue;
        };
        if quantity <= 0 || !price.is_finite() || price <= 0.0 {
            continue;
        }
        rows.push(Observation {
            price,
            quantity: quantity as u64,
            month,
        });
    }
    Ok(rows)
}
