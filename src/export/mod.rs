// src/export/mod.rs

//! Final shaping and serialisation of the cleaned table.

use crate::error::{PipelineError, Result};
use crate::process::utils::{column_index, replace_column};
use arrow::{
    compute::cast,
    csv::WriterBuilder,
    datatypes::{DataType, Schema},
    record_batch::RecordBatch,
};
use std::{fs, path::Path, sync::Arc, time::Instant};
use tracing::info;

const DELIMITER: u8 = b';';

/// Drop the time of day from the date column (`Timestamp` → `Date32`).
pub fn truncate_dates(batch: &RecordBatch, column: &str) -> Result<RecordBatch> {
    let idx = column_index(batch, column)?;
    let dates = cast(batch.column(idx), &DataType::Date32)?;
    replace_column(batch, idx, dates)
}

/// Keep exactly `columns`, in that order. Every absent name is reported in
/// one schema error.
pub fn select_columns(batch: &RecordBatch, columns: &[String]) -> Result<RecordBatch> {
    let schema = batch.schema();
    let missing: Vec<String> = columns
        .iter()
        .filter(|c| schema.index_of(c).is_err())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }

    let indices = columns
        .iter()
        .map(|c| schema.index_of(c))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let projected: Schema = schema.project(&indices)?;
    let cols = indices.iter().map(|&i| batch.column(i).clone()).collect();

    RecordBatch::try_new(Arc::new(projected), cols).map_err(Into::into)
}

/// Serialise with a header row and no index, `;`-separated, then encode the
/// whole text as Latin-1. Nulls are written as empty fields.
pub fn write_latin1_csv(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();

    let mut writer = WriterBuilder::new()
        .with_header(true)
        .with_delimiter(DELIMITER)
        .with_date_format("%Y-%m-%d".to_string())
        .build(Vec::new());
    writer.write(batch)?;
    let buf = writer.into_inner();

    let text = String::from_utf8_lossy(&buf);
    if let Some(ch) = text.chars().find(|c| u32::from(*c) > 0xFF) {
        return Err(PipelineError::Encoding {
            ch,
            path: path.to_path_buf(),
        });
    }
    let bytes = encoding_rs::mem::encode_latin1_lossy(&text);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    fs::write(path, &bytes).map_err(|e| PipelineError::io(path, e))?;
    Ok(bytes.len() as u64)
}

/// Truncate dates, select the output columns and write the file.
#[tracing::instrument(
    level = "info",
    skip(batch, columns, path),
    fields(path = %path.as_ref().display())
)]
pub fn export(
    batch: &RecordBatch,
    date_column: &str,
    columns: &[String],
    path: impl AsRef<Path>,
) -> Result<u64> {
    let start = Instant::now();
    let batch = truncate_dates(batch, date_column)?;
    let batch = select_columns(&batch, columns)?;
    let bytes = write_latin1_csv(&batch, path)?;

    info!(
        rows = batch.num_rows(),
        bytes,
        elapsed = ?start.elapsed(),
        "dataset written"
    );
    Ok(bytes)
}
