use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::{Error, Result};

/// How to behave when another process already holds the lock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LockMode {
    /// Block until the current holder releases it.
    #[default]
    Wait,
    /// Fail immediately with [`Error::Locked`].
    Try,
}

/// Exclusive advisory lock on a lock file, released on drop.
///
/// The lock file itself is never removed; deleting it while another process
/// waits on the same path would let two holders in at once.
#[derive(Debug)]
pub struct InstallLock {
    file: File,
    path: PathBuf,
}

impl InstallLock {
    fn open(path: &Path) -> Result<File> {
        File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::Lock {
                path: path.to_path_buf(),
                source: e,
            })
    }

    pub fn acquire(path: impl AsRef<Path>, mode: LockMode) -> Result<Self> {
        let path = path.as_ref();
        let file = Self::open(path)?;

        match mode {
            LockMode::Wait => file.lock_exclusive().map_err(|e| Error::Lock {
                path: path.to_path_buf(),
                source: e,
            })?,
            LockMode::Try => file.try_lock_exclusive().map_err(|e| {
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
                {
                    Error::Locked {
                        path: path.to_path_buf(),
                    }
                } else {
                    Error::Lock {
                        path: path.to_path_buf(),
                        source: e,
                    }
                }
            })?,
        }

        debug!(path = %path.display(), "acquired install lock");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!(path = %self.path.display(), "released install lock");
    }
}
