use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::{Error, Result};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicWriteOptions {
    /// Flush the temporary file to disk before the rename.
    pub sync: bool,
}

impl AtomicWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Write `content` to `path` through a sibling temporary file and a rename.
///
/// Readers of `path` observe either the previous file or the complete new
/// content, never a truncated file.
pub fn atomic_write(
    path: impl AsRef<Path>,
    content: &[u8],
    options: AtomicWriteOptions,
) -> Result<()> {
    atomic_copy(content, path, options).map(|_| ())
}

/// Stream `reader` into `path` with the same all-or-nothing guarantee as
/// [`atomic_write`]. Returns the number of bytes placed.
///
/// A failure of `reader` is reported as [`Error::Source`], a failure of the
/// destination filesystem as [`Error::Write`]. Either way the temporary file
/// is removed and any existing file at `path` is left untouched.
pub fn atomic_copy<R: Read>(
    mut reader: R,
    path: impl AsRef<Path>,
    options: AtomicWriteOptions,
) -> Result<u64> {
    let path = path.as_ref();
    let tmp_path = temp_path_for(path)?;

    let written = match write_temp(&mut reader, &tmp_path, path, options) {
        Ok(written) => written,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
    };

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(written)
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Create `path` and any missing parents. Succeeds when the directory
/// already exists, including when another writer created it concurrently.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Remove temporary files that an interrupted [`atomic_copy`] left anywhere
/// under `dir`. Returns how many were removed. A missing `dir` is empty.
pub fn remove_stale_temps(dir: impl AsRef<Path>) -> Result<usize> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| Error::Read {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || !is_temp_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        fs::remove_file(entry.path()).map_err(|e| Error::Write {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        debug!(path = %entry.path().display(), "removed stale temporary file");
        removed += 1;
    }
    Ok(removed)
}

/// Matches names produced by [`temp_path_for`]: `.<name>.<32 hex>.tmp`.
fn is_temp_name(name: &str) -> bool {
    let Some((prefix, id)) = name.strip_suffix(".tmp").and_then(|stem| stem.rsplit_once('.')) else {
        return false;
    };
    prefix.len() > 1 && prefix.starts_with('.') && id.len() == 32 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let parent = path.parent().ok_or_else(|| Error::Write {
        path: path.to_path_buf(),
        source: io::Error::other("no parent directory"),
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parent.join(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple())))
}

fn write_temp<R: Read>(
    reader: &mut R,
    tmp_path: &Path,
    path: &Path,
    options: AtomicWriteOptions,
) -> Result<u64> {
    let write_err = |e| Error::Write {
        path: tmp_path.to_path_buf(),
        source: e,
    };

    let mut file = File::create(tmp_path).map_err(write_err)?;
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(Error::Source {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        file.write_all(&buffer[..n]).map_err(write_err)?;
        written += n as u64;
    }

    if options.sync {
        file.sync_all().map_err(write_err)?;
    }

    Ok(written)
}
