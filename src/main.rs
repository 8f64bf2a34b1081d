use anyhow::{Context, Result};
use std::{env, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use transparencia_etl::{pipeline, PipelineConfig};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = match env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => PipelineConfig::from_yaml_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    info!(
        url = %config.source_url,
        raw = %config.raw_dir.display(),
        processed = %config.processed_dir.display(),
        "configured"
    );

    // ─── 3) fetch → transform → export ───────────────────────────────
    let summary = pipeline::run(&config)
        .inspect_err(|e| error!("run failed: {}", e))
        .context("pipeline aborted")?;

    info!(
        rows = summary.rows,
        null_dates = summary.null_dates,
        output = %summary.output_file.display(),
        "all done"
    );
    Ok(())
}
