use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create workspace with prefix '{prefix}': {source}")]
    Acquire { prefix: String, source: io::Error },

    #[error("failed to canonicalize workspace root '{path}': {source}")]
    Canonicalize { path: PathBuf, source: io::Error },

    #[error("failed to remove workspace '{path}': {source}")]
    Release { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
