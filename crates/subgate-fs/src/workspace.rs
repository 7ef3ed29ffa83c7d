use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{Error, Result};

/// Exclusively owned scratch directory for a single review run.
///
/// The orchestrator acquires it first and calls [`Workspace::release`] once the
/// run body has returned. If the value is dropped without release (a panic
/// unwinding through the run), the directory is still removed.
pub struct Workspace {
    dir: Option<TempDir>,
    root: PathBuf,
}

impl Workspace {
    pub fn acquire(prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|e| Error::Acquire {
                prefix: prefix.to_string(),
                source: e,
            })?;

        // Guard comparisons need the resolved root, e.g. /var -> /private/var.
        let root = std::fs::canonicalize(dir.path()).map_err(|e| Error::Canonicalize {
            path: dir.path().to_path_buf(),
            source: e,
        })?;

        tracing::debug!(root = %root.display(), "acquired workspace");
        Ok(Self {
            dir: Some(dir),
            root,
        })
    }

    /// Canonical absolute path of the workspace root.
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn release(mut self) -> Result<()> {
        match self.dir.take() {
            Some(dir) => {
                dir.close().map_err(|e| Error::Release {
                    path: self.root.clone(),
                    source: e,
                })?;
                tracing::debug!(root = %self.root.display(), "released workspace");
                Ok(())
            }
            None => Ok(()),
        }
    }
}
