use std::collections::HashSet;

use crate::process::{
    dataset::{Dataset, DATE_COLUMN, VALUE_COLUMN},
    utils::{parse_bool, parse_number},
    ValidationError,
};

/// How a cell takes part in row equality.
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Text(&'a str),
    /// f64 bits with -0.0 folded into 0.0 and every NaN made canonical.
    Number(u64),
    Bool(bool),
}

fn value_key(cell: &str) -> CellKey<'_> {
    if let Some(v) = parse_number(cell) {
        let v = if v.is_nan() { f64::NAN } else { v + 0.0 };
        CellKey::Number(v.to_bits())
    } else if let Some(b) = parse_bool(cell) {
        CellKey::Bool(b)
    } else {
        CellKey::Text(cell)
    }
}

/// Rows whose `Date` cell is null.
pub fn count_missing_dates(ds: &Dataset) -> Result<usize, ValidationError> {
    let idx = ds.required_column(DATE_COLUMN)?;
    Ok(ds.rows.iter().filter(|row| row[idx].is_none()).count())
}

/// Rows that repeat an earlier row across every column. Nulls match nulls,
/// and `Value` cells compare by what they parse to, so `1` equals `1.0`.
pub fn count_duplicate_rows(ds: &Dataset) -> usize {
    let value_idx = ds.column_index(VALUE_COLUMN);
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(ds.rows.len());
    let mut duplicates = 0;
    for row in &ds.rows {
        let key: Vec<CellKey<'_>> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell.as_deref() {
                None => CellKey::Null,
                Some(c) if Some(i) == value_idx => value_key(c),
                Some(c) => CellKey::Text(c),
            })
            .collect();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}

/// Rows whose `Value` is below zero. Null and boolean values are never
/// negative; any other non-numeric cell fails the whole check.
pub fn count_negative_values(ds: &Dataset) -> Result<usize, ValidationError> {
    let idx = ds.required_column(VALUE_COLUMN)?;
    let mut negatives = 0;
    for (i, row) in ds.rows.iter().enumerate() {
        let Some(cell) = row[idx].as_deref() else {
            continue;
        };
        if parse_bool(cell).is_some() {
            continue;
        }
        let v = parse_number(cell).ok_or_else(|| ValidationError::NonNumericValue {
            row: i + 1,
            value: cell.to_string(),
        })?;
        if v < 0.0 {
            negatives += 1;
        }
    }
    Ok(negatives)
}
