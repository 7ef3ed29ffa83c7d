//! Pick the newest submission archive from a watch directory.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("could not read directory '{dir}': {source}")]
    ReadDir { dir: PathBuf, source: io::Error },

    #[error("no .zip files found in '{dir}'")]
    NoArchive { dir: PathBuf },
}

/// Most recently modified `.zip` file directly inside `dir`.
///
/// Entries whose metadata cannot be read are skipped.
pub fn latest_archive(dir: &Path) -> Result<PathBuf, DiscoverError> {
    let entries = std::fs::read_dir(dir).map_err(|e| DiscoverError::ReadDir {
        dir: dir.to_path_buf(),
        source: e,
    })?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != ARCHIVE_EXTENSION) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let Ok(modified) = meta.modified() else {
            continue;
        };

        if latest.as_ref().is_none_or(|(t, _)| modified > *t) {
            latest = Some((modified, path));
        }
    }

    match latest {
        Some((_, path)) => {
            tracing::info!(archive = %path.display(), "auto-selected newest submission");
            Ok(path)
        }
        None => Err(DiscoverError::NoArchive {
            dir: dir.to_path_buf(),
        }),
    }
}
