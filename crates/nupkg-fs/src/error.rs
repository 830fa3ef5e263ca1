use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// The caller-provided reader failed while its bytes were being placed at `path`.
    #[error("failed to read source data for {path}: {source}")]
    Source { path: PathBuf, source: io::Error },

    #[error("failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to lock {path}: {source}")]
    Lock { path: PathBuf, source: io::Error },

    #[error("{path} is locked by another process")]
    Locked { path: PathBuf },
}

impl Error {
    pub fn path(&self) -> &Path {
        match self {
            Self::Write { path, .. }
            | Self::Read { path, .. }
            | Self::Source { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Lock { path, .. }
            | Self::Locked { path } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
