use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("unsupported archive format: '{path}'")]
    UnsupportedFormat { path: PathBuf },

    #[error("archive is corrupted: {reason}")]
    Corrupted { reason: String },

    #[error("failed to read entry '{entry}': {source}")]
    ReadEntry { entry: String, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to set permissions on '{path}': {source}")]
    PermissionFailed { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Failures that happen before any entry is processed: the input itself
    /// could not be opened or recognised.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::Open { .. } | Self::UnsupportedFormat { .. } | Self::Corrupted { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_time_failures_are_setup() {
        let open = Error::Open {
            path: PathBuf::from("a.zip"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(open.is_setup());
        assert!(Error::UnsupportedFormat { path: "a.rar".into() }.is_setup());
    }

    #[test]
    fn extraction_failures_are_not_setup() {
        let write = Error::ExtractionFailed {
            path: PathBuf::from("/tmp/x"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!write.is_setup());
        assert!(!Error::Io(io::Error::other("disk full")).is_setup());
    }
}
