// src/process/mod.rs
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{error, info, warn};

pub mod checks;
pub mod dataset;
pub mod utils;

pub use dataset::{load_dataset, Dataset};

/// One data-quality problem. Each check yields at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issue {
    MissingDates,
    DuplicateRecords,
    NegativeValues,
}

impl Issue {
    pub fn message(&self) -> &'static str {
        match self {
            Issue::MissingDates => "Há datas ausentes na planilha.",
            Issue::DuplicateRecords => "Há registros duplicados na planilha.",
            Issue::NegativeValues => "Há valores negativos na planilha.",
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Why a file could not be validated. Distinct from "validated, no issues".
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file has no header row")]
    Empty,
    #[error("malformed CSV{}: {message}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse { line: Option<u64>, message: String },
    #[error("required column {column:?} is missing")]
    MissingColumn { column: &'static str },
    #[error("non-numeric Value {value:?} in data row {row}")]
    NonNumericValue { row: usize, value: String },
}

impl ValidationError {
    pub(crate) fn from_csv(path: &Path, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => ValidationError::Io {
                path: path.to_path_buf(),
                source,
            },
            _ => ValidationError::Parse { line, message },
        }
    }
}

/// Violation counts per check, in check order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub rows: usize,
    pub missing_dates: usize,
    pub duplicate_rows: usize,
    pub negative_values: usize,
}

impl ValidationSummary {
    pub fn evaluate(ds: &Dataset) -> Result<Self, ValidationError> {
        Ok(Self {
            rows: ds.rows.len(),
            missing_dates: checks::count_missing_dates(ds)?,
            duplicate_rows: checks::count_duplicate_rows(ds),
            negative_values: checks::count_negative_values(ds)?,
        })
    }

    /// Issues in check order: dates, duplicates, negatives.
    pub fn issues(&self) -> Vec<Issue> {
        [
            (self.missing_dates, Issue::MissingDates),
            (self.duplicate_rows, Issue::DuplicateRecords),
            (self.negative_values, Issue::NegativeValues),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(_, issue)| issue)
        .collect()
    }
}

/// Load the CSV at `path` and run the three checks.
///
/// Failures are logged and returned; the caller decides how an unvalidated
/// file is reported.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn verify_data<P: AsRef<Path>>(path: P) -> Result<Vec<Issue>, ValidationError> {
    let path = path.as_ref();
    let summary = load_dataset(path)
        .and_then(|ds| ValidationSummary::evaluate(&ds))
        .map_err(|e| {
            error!(error = %e, "could not validate spreadsheet");
            e
        })?;

    let issues = summary.issues();
    if issues.is_empty() {
        info!(rows = summary.rows, "no problems found");
    } else {
        warn!(
            rows = summary.rows,
            missing_dates = summary.missing_dates,
            duplicate_rows = summary.duplicate_rows,
            negative_values = summary.negative_values,
            "found {} problem(s)",
            issues.len()
        );
    }
    Ok(issues)
}
