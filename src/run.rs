// src/run.rs
use anyhow::{Context, Result};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use crate::{
    config::Config,
    fetch,
    process::{self, Issue},
    report,
};

/// What the report ended up saying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Clean,
    Issues(Vec<Issue>),
    /// Validation could not run; the report says so along with this reason.
    Unvalidated(String),
}

/// Owns the downloaded spreadsheet and removes it when dropped.
pub struct DownloadGuard {
    path: PathBuf,
}

impl DownloadGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DownloadGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "removed temporary file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => error!(path = %self.path.display(), error = %e, "failed to remove temporary file"),
        }
    }
}

/// Download → validate → report, then drop the download on every exit path.
///
/// Download and report failures are returned. A validation failure is logged,
/// written to the report as "could not verify", and the run still succeeds.
pub async fn run(cfg: &Config) -> Result<RunOutcome> {
    cfg.validate().context("invalid configuration")?;

    fs::create_dir_all(&cfg.workspace_dir).with_context(|| {
        format!(
            "creating workspace directory {}",
            cfg.workspace_dir.display()
        )
    })?;

    let client = fetch::build_client(cfg.timeout()).context("building HTTP client")?;
    let report_path = cfg.report_path();

    // ─── 1) fetch ─────────────────────────────────────────────────────
    let download = DownloadGuard::new(cfg.input_path());
    fetch::download_file(&client, &cfg.source_url, download.path())
        .await
        .context("downloading spreadsheet")?;
    info!(path = %download.path().display(), "spreadsheet saved");

    // ─── 2) validate ─────────────────────────────────────────────────
    let outcome = match process::verify_data(download.path()) {
        Ok(issues) => {
            report::write_report(issues.as_slice(), &report_path).context("generating report")?;
            if issues.is_empty() {
                RunOutcome::Clean
            } else {
                RunOutcome::Issues(issues)
            }
        }
        Err(e) => {
            warn!(error = %e, "spreadsheet could not be validated; reporting as unverified");
            report::write_unvalidated_report(&e, &report_path)
                .context("generating report")?;
            RunOutcome::Unvalidated(e.to_string())
        }
    };

    info!(report = %report_path.display(), "run complete");
    Ok(outcome)
}
