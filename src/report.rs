// src/report.rs
use std::{
    fmt::{Display, Write as _},
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{error, info};

pub const ISSUES_HEADER: &str = "Problemas encontrados:\n";
pub const NO_ISSUES: &str = "Nenhum problema encontrado.";
pub const UNVALIDATED_PREFIX: &str = "Não foi possível verificar a planilha: ";

#[derive(Debug, Error)]
#[error("writing report to {path}")]
pub struct ReportError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Header plus one `- issue` line each, or the fixed no-problems sentence
/// (which has no trailing newline).
pub fn render_report<I: Display>(issues: &[I]) -> String {
    if issues.is_empty() {
        return NO_ISSUES.to_string();
    }
    let mut out = String::from(ISSUES_HEADER);
    for issue in issues {
        // writing into a String cannot fail
        let _ = writeln!(out, "- {}", issue);
    }
    out
}

/// Report body for a file that could not be checked at all.
pub fn render_unvalidated(reason: &dyn Display) -> String {
    format!("{}{}\n", UNVALIDATED_PREFIX, reason)
}

#[tracing::instrument(level = "info", skip(issues, path), fields(path = %path.as_ref().display(), issues = issues.len()))]
pub fn write_report<I: Display, P: AsRef<Path>>(issues: &[I], path: P) -> Result<(), ReportError> {
    write_text(path.as_ref(), &render_report(issues))
}

#[tracing::instrument(level = "info", skip(reason, path), fields(path = %path.as_ref().display()))]
pub fn write_unvalidated_report<P: AsRef<Path>>(
    reason: &dyn Display,
    path: P,
) -> Result<(), ReportError> {
    write_text(path.as_ref(), &render_unvalidated(reason))
}

/// Write via a sibling temp file and rename it over `path`.
fn write_text(path: &Path, body: &str) -> Result<(), ReportError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let res = fs::write(&tmp_path, body).and_then(|_| fs::rename(&tmp_path, path));
    if let Err(source) = res {
        let _ = fs::remove_file(&tmp_path);
        error!(error = %source, "failed to write report");
        return Err(ReportError {
            path: path.to_path_buf(),
            source,
        });
    }

    info!("report written");
    Ok(())
}
