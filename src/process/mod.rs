// src/process/mod.rs
use crate::error::{PipelineError, Result};
use crate::process::schema::ColumnPlan;
use arrow::{
    compute::concat_batches,
    csv::ReaderBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{fs, io::Cursor, path::Path, sync::Arc};
use tracing::info;

pub mod convert;
pub mod date_parser;
pub mod headers;
pub mod schema;
pub mod trimming;
pub mod utils;

const DELIMITER: u8 = b';';
const BATCH_ROWS: usize = 64 * 1024;

/// Output of [`transform`].
#[derive(Debug)]
pub struct Transformed {
    pub batch: RecordBatch,
    /// Dates that did not parse and were set to null.
    pub null_dates: usize,
}

/// Load a `;`-separated Latin-1 CSV with a header row. Every column comes in
/// as nullable text; an empty field is null, as are the missing trailing
/// fields of a short row.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table(path: impl AsRef<Path>) -> Result<RecordBatch> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    let text = encoding_rs::mem::decode_latin1(&bytes);

    let headers: Vec<String> = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .from_reader(text.as_bytes())
        .headers()?
        .iter()
        .map(String::from)
        .collect();

    let fields: Vec<Field> = headers
        .iter()
        .map(|h| Field::new(h, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    if headers.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(DELIMITER)
        .with_quote(b'"')
        .with_truncated_rows(true)
        .with_batch_size(BATCH_ROWS)
        .build(Cursor::new(text.as_bytes()))?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "table loaded"
    );
    Ok(batch)
}

/// Header normalization, then value coercion, in a fixed order:
/// rename, monetary, dates, identifiers, text.
///
/// The rename check runs first so a file with the wrong layout fails with a
/// schema error before any value is looked at.
#[tracing::instrument(level = "info", skip_all)]
pub fn transform(batch: &RecordBatch, plan: &ColumnPlan) -> Result<Transformed> {
    let batch = headers::normalize_and_rename(batch, &plan.date_source, &plan.date_column)?;
    let batch = convert::convert_monetary(&batch, &plan.value_column)?;
    let (batch, null_dates) = convert::convert_dates(&batch, &plan.date_column)?;
    let batch = convert::convert_integers(&batch, &plan.integer_columns)?;
    let batch = trimming::apply_trimming(&batch, &plan.text_columns)?;

    info!(rows = batch.num_rows(), null_dates, "table transformed");
    Ok(Transformed { batch, null_dates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, StringArray};
    use tempfile::tempdir;

    /// Latin-1 bytes for `s`; test fixtures stay within that range.
    fn latin1(s: &str) -> Vec<u8> {
        s.chars().map(|c| c as u32 as u8).collect()
    }

    #[test]
    fn loads_latin1_semicolon_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("d.csv");
        fs::write(
            &path,
            latin1("\"Nome Município\";\"Valor Recebido\"\n\"São Paulo\";\"1.234,56\"\n\"\";\"0,00\"\n"),
        )?;

        let batch = load_table(&path)?;
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(0).name(), "Nome Município");

        let city = batch.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(city.value(0), "São Paulo");
        assert!(city.is_null(1));
        Ok(())
    }

    #[test]
    fn header_only_file_is_empty_table() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("d.csv");
        fs::write(&path, latin1("a;b\n"))?;

        let batch = load_table(&path)?;
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
        Ok(())
    }

    #[test]
    fn short_row_loads_missing_fields_as_null() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("d.csv");
        fs::write(&path, latin1("a;b\n1;2\n3\n"))?;

        let batch = load_table(&path)?;
        assert_eq!(batch.num_rows(), 2);
        let b = batch.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(b.value(0), "2");
        assert!(b.is_null(1));
        Ok(())
    }

    #[test]
    fn wrong_layout_fails_before_coercion() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("d.csv");
        // the value is malformed too, but the schema check must win
        fs::write(&path, latin1("Valor Recebido;Data\nxx;05/11/2025\n"))?;

        let batch = load_table(&path)?;
        let err = transform(&batch, &ColumnPlan::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema { .. }), "{err}");
        Ok(())
    }
}
