use anyhow::{Context, Result};
use sheetcheck::{config::Config, run, RunOutcome};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sheetcheck=debug"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let cfg = Config::load().context("loading configuration")?;
    info!(
        source = %cfg.source_url,
        workspace = %cfg.workspace_dir.display(),
        "configured"
    );

    // ─── 3) download, validate, report ───────────────────────────────
    match run(&cfg).await? {
        RunOutcome::Clean => info!("no problems found"),
        RunOutcome::Issues(issues) => info!("{} problem(s) reported", issues.len()),
        RunOutcome::Unvalidated(reason) => info!(%reason, "spreadsheet reported as unverified"),
    }

    info!("all done");
    Ok(())
}
