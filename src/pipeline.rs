// src/pipeline.rs

//! Fetch → Transform → Export, strictly in that order. The first error ends
//! the run.

use crate::{config::PipelineConfig, error::Result, export, fetch, process};
use std::path::{Path, PathBuf};
use tracing::info;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub data_file: PathBuf,
    pub output_file: PathBuf,
    pub rows: usize,
    pub null_dates: usize,
}

/// Full run: download the archive, then [`process_archive`].
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    config.ensure_dirs()?;

    let client = fetch::build_client(config)?;
    let archive = config.archive_path();
    fetch::download_zip(&client, &config.source_url, &config.user_agent, &archive)?;

    process_archive(config, &archive)
}

/// Extract, transform and export an archive that is already on disk.
#[tracing::instrument(
    level = "info",
    skip(config, archive),
    fields(archive = %archive.as_ref().display())
)]
pub fn process_archive(config: &PipelineConfig, archive: impl AsRef<Path>) -> Result<RunSummary> {
    config.ensure_dirs()?;

    fetch::extract_zip(archive, &config.raw_dir)?;
    let data_file = fetch::find_data_file(&config.raw_dir)?;

    let table = process::load_table(&data_file)?;
    let plan = &config.columns;
    let transformed = process::transform(&table, plan)?;
    drop(table);

    let output_file = config.output_path();
    export::export(
        &transformed.batch,
        &plan.date_column,
        &plan.output_columns,
        &output_file,
    )?;

    info!(output = %output_file.display(), "dataset ready for visualization");
    Ok(RunSummary {
        data_file,
        output_file,
        rows: transformed.batch.num_rows(),
        null_dates: transformed.null_dates,
    })
}
