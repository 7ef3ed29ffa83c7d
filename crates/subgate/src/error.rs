use std::path::PathBuf;

use crate::discover::DiscoverError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Workspace(#[from] subgate_fs::Error),

    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error(transparent)]
    Archive(#[from] subgate_archive::Error),

    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("cannot locate runner script next to executable: {0}")]
    RunnerLocation(PathBuf),
}

/// Which side of the fence a failure falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input or environment could not be prepared.
    Setup,
    /// Reading or writing failed mid-extraction.
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Archive(e) if !e.is_setup() => ErrorKind::Io,
            _ => ErrorKind::Setup,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
