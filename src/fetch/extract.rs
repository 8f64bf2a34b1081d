use crate::error::{PipelineError, Result};
use glob::{glob_with, MatchOptions, Pattern};
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Extract every member of `zip_path` into `dest_dir`.
///
/// A file already sitting at a member's target is removed first, so re-running
/// over a previous extraction never trips on leftovers. Returns the extracted
/// file paths in archive order.
#[tracing::instrument(
    level = "info",
    skip(zip_path, dest_dir),
    fields(zip = %zip_path.as_ref().display())
)]
pub fn extract_zip(
    zip_path: impl AsRef<Path>,
    dest_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let zip_path = zip_path.as_ref();
    let dest_dir = dest_dir.as_ref();

    let file = File::open(zip_path).map_err(|e| PipelineError::io(zip_path, e))?;
    let mut archive = ZipArchive::new(file)?;
    let mut extracted = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let rel = entry
            .enclosed_name()
            .ok_or_else(|| PipelineError::UnsafeMember {
                name: entry.name().to_string(),
                dir: dest_dir.to_path_buf(),
            })?;
        let target = dest_dir.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| PipelineError::io(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        if target.is_file() {
            debug!(path = %target.display(), "removing previous extract");
            fs::remove_file(&target).map_err(|e| PipelineError::io(&target, e))?;
        }

        let mut out = File::create(&target).map_err(|e| PipelineError::io(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| PipelineError::io(&target, e))?;
        extracted.push(target);
    }

    info!(files = extracted.len(), "archive extracted");
    Ok(extracted)
}

/// Pick the tabular file among the extracted members.
///
/// Matches `*.csv` (any case) directly under `dir`; the first path in
/// lexicographic order wins.
pub fn find_data_file(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let pattern = format!("{}/*.csv", Pattern::escape(&dir.to_string_lossy()));
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut candidates: Vec<PathBuf> = glob_with(&pattern, options)?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    candidates.sort();

    if let [chosen, skipped @ ..] = candidates.as_slice() {
        if !skipped.is_empty() {
            let skipped: Vec<String> = skipped.iter().map(|p| p.display().to_string()).collect();
            warn!(
                chosen = %chosen.display(),
                skipped = ?skipped,
                "several CSV files in raw directory; using the first"
            );
        }
    }

    let first = candidates
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::NoDataFile {
            dir: dir.to_path_buf(),
        })?;
    info!(
        file = %first.file_name().unwrap_or_default().to_string_lossy(),
        "data file identified"
    );
    Ok(first)
}
