//! Column-name canonicalisation.
//!
//! Source headers are Portuguese labels such as `"Ano e mês do lançamento"`;
//! downstream everything is addressed by a space-free ASCII key
//! (`"Anoemesdolancamento"`).

use crate::error::{PipelineError, Result};
use crate::process::utils::rename_columns;
use arrow::record_batch::RecordBatch;
use tracing::debug;

/// ASCII residue of a compatibility decomposition (NFKD) for the Latin-1
/// block. `None` means nothing ASCII survives.
fn fold_latin1(c: char) -> Option<&'static str> {
    let s = match c {
        '\u{A0}' | '\u{A8}' | '\u{AF}' | '\u{B4}' | '\u{B8}' => " ",
        'ª' => "a",
        '²' => "2",
        '³' => "3",
        '¹' => "1",
        'º' => "o",
        '¼' => "14",
        '½' => "12",
        '¾' => "34",
        'À'..='Å' => "A",
        'Ç' => "C",
        'È'..='Ë' => "E",
        'Ì'..='Ï' => "I",
        'Ñ' => "N",
        'Ò'..='Ö' => "O",
        'Ù'..='Ü' => "U",
        'Ý' => "Y",
        'à'..='å' => "a",
        'ç' => "c",
        'è'..='ë' => "e",
        'ì'..='ï' => "i",
        'ñ' => "n",
        'ò'..='ö' => "o",
        'ù'..='ü' => "u",
        'ý' | 'ÿ' => "y",
        _ => return None,
    };
    Some(s)
}

/// Trim, strip diacritics down to ASCII (dropping whatever has no ASCII
/// base), then remove spaces.
pub fn normalize_header(raw: &str) -> String {
    let mut ascii = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_ascii() {
            ascii.push(c);
        } else if let Some(base) = fold_latin1(c) {
            ascii.push_str(base);
        }
    }
    ascii.replace(' ', "")
}

/// Normalize every header, then rename `date_source` to `date_column`.
///
/// Fails before touching any values when the date source is absent.
pub fn normalize_and_rename(
    batch: &RecordBatch,
    date_source: &str,
    date_column: &str,
) -> Result<RecordBatch> {
    let mut names: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| normalize_header(f.name()))
        .collect();
    debug!(?names, "normalized headers");

    let pos = names
        .iter()
        .position(|n| n == date_source)
        .ok_or_else(|| PipelineError::missing_column(date_source))?;
    names[pos] = date_column.to_string();

    rename_columns(batch, &names)
}
