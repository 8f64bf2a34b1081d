// src/config.rs

use crate::error::{PipelineError, Result};
use crate::process::schema::ColumnPlan;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

const DEFAULT_SOURCE_URL: &str =
    "https://portaldatransparencia.gov.br/download-de-dados/despesas-favorecidos/202511";

/// Everything the run needs, handed to [`crate::pipeline::run`] at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source_url: String,
    pub user_agent: String,
    /// Downloaded archive and its extracted members.
    pub raw_dir: PathBuf,
    /// Final cleaned dataset.
    pub processed_dir: PathBuf,
    pub archive_name: String,
    pub output_name: String,
    /// Request timeout in seconds; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub columns: ColumnPlan,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.into(),
            user_agent: "Mozilla/5.0".into(),
            raw_dir: PathBuf::from("data_raw"),
            processed_dir: PathBuf::from("data_processed"),
            archive_name: "despesas_favorecidos_202511.zip".into(),
            output_name: "despesas_favorecidos_202511_powerbi.csv".into(),
            timeout_secs: None,
            columns: ColumnPlan::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults with both data directories placed under `base`.
    pub fn with_base_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            raw_dir: base.join("data_raw"),
            processed_dir: base.join("data_processed"),
            ..Self::default()
        }
    }

    /// Load a YAML config. Relative directories resolve against the file's
    /// own directory, not the working directory.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let mut cfg: Self = serde_yaml::from_str(&text).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        if cfg.raw_dir.is_relative() {
            cfg.raw_dir = base.join(&cfg.raw_dir);
        }
        if cfg.processed_dir.is_relative() {
            cfg.processed_dir = base.join(&cfg.processed_dir);
        }

        cfg.validate().map_err(|reason| PipelineError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(cfg)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        Url::parse(&self.source_url).map_err(|e| format!("source_url: {e}"))?;
        for (field, name) in [
            ("archive_name", &self.archive_name),
            ("output_name", &self.output_name),
        ] {
            let p = Path::new(name);
            if name.is_empty() || p.file_name() != Some(p.as_os_str()) {
                return Err(format!("{field} must be a bare file name, got {name:?}"));
            }
        }
        if self.columns.output_columns.is_empty() {
            return Err("columns.output_columns is empty".into());
        }
        Ok(())
    }

    /// Create the raw and processed directories if absent.
    pub fn ensure_dirs(&self) -> Result<()> {
        for d in [&self.raw_dir, &self.processed_dir] {
            fs::create_dir_all(d).map_err(|e| PipelineError::io(d, e))?;
        }
        Ok(())
    }

    pub fn archive_path(&self) -> PathBuf {
        self.raw_dir.join(&self.archive_name)
    }

    pub fn output_path(&self) -> PathBuf {
        self.processed_dir.join(&self.output_name)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
