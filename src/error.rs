// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Every failure the pipeline can hit. All of them are fatal: the run stops
/// at the first one and no partial output is produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    // === Fetch ===
    /// The server answered with anything other than 200.
    #[error("download of {url} failed with status {status}")]
    Download { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// Extraction left no `*.csv` file behind.
    #[error("no CSV file found in {dir} after extracting the archive")]
    NoDataFile { dir: PathBuf },

    #[error("failed to read ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive member {name:?} would extract outside {dir}")]
    UnsafeMember { name: String, dir: PathBuf },

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    // === Transform ===
    /// One or more required columns are absent.
    #[error("missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A monetary or identifier value could not be coerced.
    #[error("cannot parse {value:?} in column {column} at data row {row}")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("table operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    // === Export ===
    /// Output text holds a character Latin-1 cannot represent.
    #[error("character {ch:?} cannot be encoded as Latin-1 in {path}")]
    Encoding { ch: char, path: PathBuf },

    // === Plumbing ===
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_column(name: &str) -> Self {
        Self::Schema {
            missing: vec![name.to_string()],
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
