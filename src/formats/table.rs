use std::fs;
use std::path::Path;

use ndarray::Array2;

use crate::model::{DType, Value};

use super::Result;

pub(crate) fn read_csv(path: &Path) -> Result<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| field.trim().parse().unwrap_or(f64::NAN))
                .collect(),
        );
    }
    Ok(table_value(rows))
}

pub(crate) fn read_text(path: &Path) -> Result<Value> {
    let body = fs::read_to_string(path)?;
    let rows: Vec<Vec<f64>> = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_whitespace()
                .map(|token| token.parse().unwrap_or(f64::NAN))
                .collect()
        })
        .collect();
    Ok(table_value(rows))
}

/// Rows become a 2-D array. Cells that do not parse and the tail of any
/// short row read as NaN, so ragged tables still load.
fn table_value(rows: Vec<Vec<f64>>) -> Value {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut data = Array2::from_elem((rows.len(), width), f64::NAN);
    for (r, row) in rows.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            data[[r, c]] = value;
        }
    }
    Value::array(data.into_dyn(), DType::F64)
}
