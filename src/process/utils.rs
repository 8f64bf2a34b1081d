use crate::error::{PipelineError, Result};
use arrow::{
    array::{Array, ArrayRef, StringArray},
    compute::cast,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Position of `name` in the batch, or a schema error naming it.
pub fn column_index(batch: &RecordBatch, name: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(name)
        .map_err(|_| PipelineError::missing_column(name))
}

/// The column's values as text; a null becomes the literal `"nan"`.
pub fn text_values(arr: &ArrayRef) -> Result<Vec<String>> {
    let utf8 = cast(arr, &DataType::Utf8)?;
    let sarr = utf8
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| arrow::error::ArrowError::CastError("expected Utf8 after cast".into()))?;
    Ok(sarr
        .iter()
        .map(|opt| opt.unwrap_or("nan").to_string())
        .collect())
}

/// Swap column `idx` for `values`, taking the field type from the new array.
pub fn replace_column(batch: &RecordBatch, idx: usize, values: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields[idx] = Field::new(fields[idx].name(), values.data_type().clone(), true);

    let mut cols = batch.columns().to_vec();
    cols[idx] = values;

    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols).map_err(Into::into)
}

/// Same columns under new names.
pub fn rename_columns(batch: &RecordBatch, names: &[String]) -> Result<RecordBatch> {
    let fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .zip(names)
        .map(|(f, n)| Field::new(n, f.data_type().clone(), f.is_nullable()))
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), batch.columns().to_vec())
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;

    fn batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Utf8, true),
            Field::new("b", DataType::Int64, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec![Some("x"), None])),
                Arc::new(Int64Array::from(vec![Some(7), None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn text_values_spell_nulls_as_nan() {
        let b = batch();
        assert_eq!(text_values(b.column(0)).unwrap(), vec!["x", "nan"]);
        assert_eq!(text_values(b.column(1)).unwrap(), vec!["7", "nan"]);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let err = column_index(&batch(), "zz").unwrap_err();
        assert!(matches!(err, PipelineError::Schema { ref missing } if missing == &["zz"]));
    }

    #[test]
    fn replace_changes_type() {
        let b = batch();
        let out = replace_column(&b, 0, Arc::new(Int64Array::from(vec![1, 2]))).unwrap();
        assert_eq!(out.schema().field(0).name(), "a");
        assert_eq!(out.schema().field(0).data_type(), &DataType::Int64);
        assert_eq!(out.num_rows(), 2);
    }
}
