use std::io;
use std::path::PathBuf;

use nupkg_identity::ID_PATTERN;
use thiserror::Error;

/// Rejected install input. Messages name the offending value as given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Exactly 4 arguments required.")]
    ArgumentCount { given: usize },

    #[error("value {0} should be a valid path to the nupkg.")]
    ArchivePath(String),

    #[error("value {0} should be a valid directory.")]
    InstallRoot(String),

    #[error("value {0} should be a valid Nuget Package Id matching {pattern}.", pattern = ID_PATTERN)]
    PackageId(String),

    #[error("value {0} should be a Version.")]
    Version(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("path traversal detected: entry '{entry}' resolves to '{}'", resolved.display())]
    PathTraversal { entry: String, resolved: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to read package archive: {0}")]
    Extraction(#[source] nupkg_archive::Error),

    #[error("{} is held by another install", path.display())]
    Lock { path: PathBuf },

    #[error("install cancelled")]
    Cancelled,

    #[error("installed content does not match the archive: expected {expected}, got {actual}")]
    ContentMismatch { expected: String, actual: String },

    #[error("recorded content hash at {} is unusable: {source}", path.display())]
    InvalidHash {
        path: PathBuf,
        source: nupkg_verify::VerificationError,
    },

    #[error("package is not installed at {}", path.display())]
    NotInstalled { path: PathBuf },

    #[error("invalid install metadata at {}: {source}", path.display())]
    Metadata { path: PathBuf, source: serde_json::Error },
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    PathTraversal,
    Io,
    Extraction,
    Cancelled,
    Verification,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::PathTraversal { .. } => ErrorKind::PathTraversal,
            Self::Io { .. } | Self::Lock { .. } | Self::Metadata { .. } => ErrorKind::Io,
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::ContentMismatch { .. } | Self::InvalidHash { .. } | Self::NotInstalled { .. } => {
                ErrorKind::Verification
            }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn verification(path: impl Into<PathBuf>, e: nupkg_verify::VerificationError) -> Self {
        use nupkg_verify::VerificationError as Verify;
        match e {
            Verify::Mismatch { expected, actual } => Self::ContentMismatch { expected, actual },
            Verify::Io(source) => Self::io(path, source),
            other => Self::InvalidHash {
                path: path.into(),
                source: other,
            },
        }
    }
}

impl From<nupkg_fs::Error> for Error {
    fn from(e: nupkg_fs::Error) -> Self {
        use nupkg_fs::Error as Fs;
        match e {
            Fs::Locked { path } => Self::Lock { path },
            Fs::Write { path, source }
            | Fs::Read { path, source }
            | Fs::Source { path, source }
            | Fs::CreateDir { path, source }
            | Fs::Lock { path, source } => Self::Io { path, source },
        }
    }
}

impl From<nupkg_archive::Error> for Error {
    fn from(e: nupkg_archive::Error) -> Self {
        use nupkg_archive::Error as Archive;
        match e {
            Archive::PathTraversal { entry, resolved } => Self::PathTraversal { entry, resolved },
            Archive::Fs(fs) => fs.into(),
            Archive::Cancelled => Self::Cancelled,
            other => Self::Extraction(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_messages() {
        assert_eq!(
            ConfigurationError::ArgumentCount { given: 3 }.to_string(),
            "Exactly 4 arguments required."
        );
        assert_eq!(
            ConfigurationError::ArchivePath("/tmp/missing.nupkg".into()).to_string(),
            "value /tmp/missing.nupkg should be a valid path to the nupkg."
        );
        assert_eq!(
            ConfigurationError::InstallRoot("/tmp/file.txt".into()).to_string(),
            "value /tmp/file.txt should be a valid directory."
        );
        assert_eq!(
            ConfigurationError::PackageId("test.".into()).to_string(),
            r"value test. should be a valid Nuget Package Id matching ^\w+([_.-]\w+)*$."
        );
        assert_eq!(
            ConfigurationError::Version("invalidVersion".into()).to_string(),
            "value invalidVersion should be a Version."
        );
    }

    #[test]
    fn archive_errors_map_onto_kinds() {
        let traversal: Error = nupkg_archive::Error::PathTraversal {
            entry: "../../evil".into(),
            resolved: PathBuf::from("/evil"),
        }
        .into();
        assert_eq!(traversal.kind(), ErrorKind::PathTraversal);

        let corrupt: Error = nupkg_archive::Error::Corrupted {
            reason: "bad central directory".into(),
        }
        .into();
        assert_eq!(corrupt.kind(), ErrorKind::Extraction);

        let write: Error = nupkg_archive::Error::Fs(nupkg_fs::Error::Write {
            path: PathBuf::from("/packages/test/2.4.2/lib.dll"),
            source: io::Error::other("disk full"),
        })
        .into();
        assert_eq!(write.kind(), ErrorKind::Io);

        let cancelled: Error = nupkg_archive::Error::Cancelled.into();
        assert_eq!(cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn verification_errors_map_onto_kinds() {
        let path = PathBuf::from("/packages/test/2.4.2/.nupkg.content.json");

        let mismatch = Error::verification(
            &path,
            nupkg_verify::VerificationError::Mismatch {
                expected: "abc=".into(),
                actual: "def=".into(),
            },
        );
        assert!(matches!(mismatch, Error::ContentMismatch { ref expected, .. } if expected == "abc="));

        let encoding = Error::verification(&path, nupkg_verify::ContentHash::from_base64("not base64!").unwrap_err());
        assert!(matches!(encoding, Error::InvalidHash { .. }));
        assert_eq!(encoding.kind(), ErrorKind::Verification);

        let io = Error::verification(&path, io::Error::other("gone").into());
        assert_eq!(io.kind(), ErrorKind::Io);
    }

    #[test]
    fn lock_contention_is_io() {
        let err: Error = nupkg_fs::Error::Locked {
            path: PathBuf::from("/packages/test/.2.4.2.lock"),
        }
        .into();
        assert!(matches!(err, Error::Lock { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
