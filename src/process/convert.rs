use crate::error::{PipelineError, Result};
use crate::process::{
    date_parser,
    utils::{column_index, replace_column, text_values},
};
use arrow::{
    array::{ArrayRef, Float64Builder, Int64Builder, TimestampMillisecondBuilder},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// `"1.234,56"` → `1234.56`. Periods are thousands separators, the comma is
/// the decimal mark. `Some(None)` for NaN (what a missing cell turns into),
/// `None` when the text is not a number at all.
pub fn parse_monetary(raw: &str) -> Option<Option<f64>> {
    let cleaned = raw.replace('.', "").replace(',', ".");
    let v: f64 = cleaned.trim().parse().ok()?;
    Some(if v.is_nan() { None } else { Some(v) })
}

/// `"26000.0"` → `26000`, `"nan"` → null. Surrounding whitespace is ignored.
/// Anything else non-numeric is an error, signalled by the outer `None`.
pub fn parse_identifier(raw: &str) -> Option<Option<i64>> {
    let raw = raw.trim();
    let s = raw.strip_suffix(".0").unwrap_or(raw);
    if s == "nan" {
        return Some(None);
    }
    s.parse().ok().map(Some)
}

/// Coerce the monetary column to `Float64`. A malformed value aborts.
pub fn convert_monetary(batch: &RecordBatch, column: &str) -> Result<RecordBatch> {
    let idx = column_index(batch, column)?;
    let values = text_values(batch.column(idx))?;

    let mut b = Float64Builder::with_capacity(values.len());
    for (row, raw) in values.iter().enumerate() {
        let v = parse_monetary(raw).ok_or_else(|| PipelineError::Parse {
            column: column.to_string(),
            row: row + 1,
            value: raw.clone(),
        })?;
        b.append_option(v);
    }
    replace_column(batch, idx, Arc::new(b.finish()) as ArrayRef)
}

/// Coerce the date column to millisecond timestamps. Unparseable values
/// become null; their count is returned alongside the batch.
pub fn convert_dates(batch: &RecordBatch, column: &str) -> Result<(RecordBatch, usize)> {
    let idx = column_index(batch, column)?;
    let values = text_values(batch.column(idx))?;

    let mut b = TimestampMillisecondBuilder::with_capacity(values.len());
    let mut nulls = 0;
    for raw in &values {
        let ts = date_parser::parse_day_first(raw);
        if ts.is_none() {
            debug!(value = %raw, "date coerced to null");
            nulls += 1;
        }
        b.append_option(ts.map(|t| t.and_utc().timestamp_millis()));
    }
    if nulls > 0 {
        warn!(column, nulls, "unparseable dates set to null");
    }

    let out = replace_column(batch, idx, Arc::new(b.finish()) as ArrayRef)?;
    Ok((out, nulls))
}

/// Coerce identifier columns to nullable `Int64`.
pub fn convert_integers(batch: &RecordBatch, columns: &[String]) -> Result<RecordBatch> {
    let mut out = batch.clone();
    for column in columns {
        let idx = column_index(&out, column)?;
        let values = text_values(out.column(idx))?;

        let mut b = Int64Builder::with_capacity(values.len());
        for (row, raw) in values.iter().enumerate() {
            let v = parse_identifier(raw).ok_or_else(|| PipelineError::Parse {
                column: column.clone(),
                row: row + 1,
                value: raw.clone(),
            })?;
            b.append_option(v);
        }
        out = replace_column(&out, idx, Arc::new(b.finish()) as ArrayRef)?;
    }
    Ok(out)
}
