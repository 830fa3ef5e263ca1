use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path traversal detected: entry '{entry}' resolves to '{resolved}'")]
    PathTraversal { entry: String, resolved: PathBuf },

    #[error("entry name '{entry}' is not a valid relative path")]
    InvalidPath { entry: String },

    #[error("archive is corrupted: {reason}")]
    Corrupted { reason: String },

    #[error("archive has no entry named '{entry}'")]
    EntryNotFound { entry: String },

    #[error("failed to read archive entry '{entry}': {source}")]
    EntryRead { entry: String, source: io::Error },

    #[error("extraction cancelled")]
    Cancelled,

    #[error(transparent)]
    Fs(#[from] nupkg_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
