//! Project root resolution over an extracted tree.
//!
//! Submissions are often wrapped in one or more extra folders
//! (`submission-v2/app/...`). The resolver picks the directory that holds the
//! shallowest marker file and falls back to the extraction root when nothing
//! matches. Resolution is best-effort: it never fails.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub const DEFAULT_MARKERS: [&str; 2] = ["package.json", "index.html"];

pub trait RootResolver {
    /// Returns `extraction_root` or one of its descendants.
    fn resolve(&self, extraction_root: &Path) -> PathBuf;
}

/// Shallowest directory containing any of the marker file names.
#[derive(Clone, Debug)]
pub struct MarkerResolver {
    markers: Vec<String>,
}

impl MarkerResolver {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    fn is_marker(&self, name: &OsStr) -> bool {
        self.markers.iter().any(|m| OsStr::new(m) == name)
    }
}

impl Default for MarkerResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS)
    }
}

impl RootResolver for MarkerResolver {
    fn resolve(&self, extraction_root: &Path) -> PathBuf {
        let mut best: Option<(usize, PathBuf)> = None;

        // Sorted traversal keeps the tie-break stable across runs.
        let walker = WalkDir::new(extraction_root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_marker(entry.file_name()) {
                continue;
            }

            let Some(dir) = entry.path().parent() else {
                continue;
            };
            let depth = dir.components().count();

            if best.as_ref().is_none_or(|(d, _)| depth < *d) {
                best = Some((depth, dir.to_path_buf()));
            }
        }

        match best {
            Some((depth, dir)) => {
                tracing::debug!(root = %dir.display(), depth, "resolved project root");
                dir
            }
            None => extraction_root.to_path_buf(),
        }
    }
}
