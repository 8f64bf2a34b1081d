use crate::error::Result;
use crate::process::utils::{column_index, replace_column, text_values};
use arrow::{
    array::{ArrayRef, StringArray},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Strip surrounding whitespace from the named text columns.
///
/// Missing cells come out as the literal `"nan"`, not null. The identifier
/// columns treat `"nan"` the other way round.
pub fn apply_trimming(batch: &RecordBatch, trim_columns: &[String]) -> Result<RecordBatch> {
    let mut out = batch.clone();
    for column in trim_columns {
        let idx = column_index(&out, column)?;
        let trimmed: StringArray = text_values(out.column(idx))?
            .iter()
            .map(|s| Some(s.trim()))
            .collect();
        out = replace_column(&out, idx, Arc::new(trimmed) as ArrayRef)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use arrow::datatypes::{DataType, Field, Schema};

    #[test]
    fn trims_and_spells_missing_as_nan() {
        let schema = Schema::new(vec![
            Field::new("NomeFavorecido", DataType::Utf8, true),
            Field::new("Untouched", DataType::Utf8, true),
        ]);
        let b = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec![Some("  ACME LTDA \t"), None])) as ArrayRef,
                Arc::new(StringArray::from(vec![Some(" x "), None])) as ArrayRef,
            ],
        )
        .unwrap();

        let out = apply_trimming(&b, &["NomeFavorecido".to_string()]).unwrap();
        let trimmed = out.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(trimmed.value(0), "ACME LTDA");
        // documented quirk: not null
        assert_eq!(trimmed.value(1), "nan");

        let other = out.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(other.value(0), " x ");
    }
}
