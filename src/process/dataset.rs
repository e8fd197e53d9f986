use csv::ReaderBuilder;
use std::{fs::File, path::Path};
use tracing::debug;

use crate::process::{utils::clean_cell, ValidationError};

pub const DATE_COLUMN: &str = "Date";
pub const VALUE_COLUMN: &str = "Value";

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Column names from the header row, in file order.
    pub headers: Vec<String>,
    /// One entry per data row, `None` for null cells. Always `headers.len()` wide.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column the checks cannot run without.
    pub fn required_column(&self, name: &'static str) -> Result<usize, ValidationError> {
        self.column_index(name)
            .ok_or(ValidationError::MissingColumn { column: name })
    }
}

/// Read a UTF-8 CSV with a header row into memory.
///
/// Short rows are padded with nulls; a row wider than the header is a parse
/// error, as is anything the CSV reader itself rejects.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, ValidationError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ValidationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| ValidationError::from_csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(ValidationError::Empty);
    }

    let width = headers.len();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| ValidationError::from_csv(path, e))?;
        if record.len() > width {
            return Err(ValidationError::Parse {
                line: record.position().map(|p| p.line()),
                message: format!("expected {} fields, saw {}", width, record.len()),
            });
        }
        let mut row: Vec<Option<String>> = record.iter().map(clean_cell).collect();
        row.resize(width, None);
        rows.push(row);
    }

    debug!(columns = width, rows = rows.len(), "loaded dataset");
    Ok(Dataset { headers, rows })
}
