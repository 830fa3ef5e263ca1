//! Files written next to the extracted package contents.

use std::fs::{self, File};
use std::io::{self, Seek};
use std::path::Path;

use nupkg_fs::{AtomicWriteOptions, atomic_copy, atomic_read, atomic_write};
use nupkg_verify::{ContentHash, Hasher, HashingReader, Sha512Hasher};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// Presence of this file means the install completed.
pub const MARKER_FILE: &str = ".nupkg.metadata";
pub const CONTENT_RECORD_FILE: &str = ".nupkg.content.json";
pub const SIGNATURE_FILE: &str = ".signature.p7s";

const MARKER_VERSION: u32 = 2;

/// Digest of an archive and the name of the algorithm that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDigest {
    pub algorithm: &'static str,
    pub hash: ContentHash,
}

/// Digest and entry count of the archive an install came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub algorithm: String,
    pub content_hash: String,
    pub entry_count: usize,
}

impl ContentRecord {
    pub fn new(digest: &ArchiveDigest, entry_count: usize) -> Self {
        Self {
            algorithm: digest.algorithm.to_string(),
            content_hash: digest.hash.to_base64(),
            entry_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallMarker {
    pub version: u32,
    pub content_hash: String,
    pub source: String,
}

impl InstallMarker {
    pub fn new(hash: &ContentHash, source: &Path) -> Self {
        Self {
            version: MARKER_VERSION,
            content_hash: hash.to_base64(),
            source: source.to_string_lossy().into_owned(),
        }
    }
}

/// Hash the whole of `file`, the open handle of the archive at `source`.
pub fn hash_archive(file: &mut File, source: &Path) -> Result<ArchiveDigest> {
    file.rewind().map_err(|e| Error::io(source, e))?;
    let hasher = Sha512Hasher::new();
    let algorithm = hasher.algorithm();
    let mut reader = HashingReader::new(&mut *file, hasher);
    io::copy(&mut reader, &mut io::sink()).map_err(|e| Error::io(source, e))?;
    debug!(path = %source.display(), algorithm, size = reader.bytes_read(), "hashed archive");

    Ok(ArchiveDigest {
        algorithm,
        hash: reader.into_hash(),
    })
}

/// Re-read `file` and check it still hashes to `expected`.
pub fn verify_archive(file: &mut File, source: &Path, expected: &ContentHash) -> Result<ContentHash> {
    file.rewind().map_err(|e| Error::io(source, e))?;
    let mut reader = HashingReader::new(&mut *file, Sha512Hasher::new());
    io::copy(&mut reader, &mut io::sink()).map_err(|e| Error::io(source, e))?;
    reader.finish(expected).map_err(|e| Error::verification(source, e))
}

/// Copy `file` to `destination`, hashing the bytes as they are copied.
///
/// Fails with [`Error::ContentMismatch`] and removes the copy when the bytes
/// no longer hash to `expected`.
pub fn save_archive(file: &mut File, source: &Path, destination: &Path, expected: &ContentHash) -> Result<()> {
    file.rewind().map_err(|e| Error::io(source, e))?;
    let mut reader = HashingReader::new(&mut *file, Sha512Hasher::new());
    let size = atomic_copy(&mut reader, destination, AtomicWriteOptions::new()).map_err(|err| match err {
        nupkg_fs::Error::Source { source: e, .. } => Error::io(source, e),
        other => other.into(),
    })?;

    if let Err(e) = reader.finish(expected) {
        let _ = fs::remove_file(destination);
        return Err(Error::verification(source, e));
    }
    debug!(path = %destination.display(), size, "saved archive copy");
    Ok(())
}

/// `<archive>.sha512`: the base64 digest, no trailing newline.
pub fn write_hash_file(path: &Path, hash: &ContentHash) -> Result<()> {
    atomic_write(path, hash.to_base64().as_bytes(), AtomicWriteOptions::new())?;
    Ok(())
}

/// Persist the content record and, when supplied, the signature blob.
///
/// Must complete before [`write_marker`] is called.
pub fn write_metadata(
    destination: &Path,
    digest: &ArchiveDigest,
    entry_count: usize,
    signature: Option<&[u8]>,
) -> Result<ContentRecord> {
    let record = ContentRecord::new(digest, entry_count);
    write_json(&destination.join(CONTENT_RECORD_FILE), &record)?;

    if let Some(blob) = signature {
        atomic_write(destination.join(SIGNATURE_FILE), blob, AtomicWriteOptions::new())?;
    }
    Ok(record)
}

pub fn write_marker(destination: &Path, marker: &InstallMarker) -> Result<()> {
    write_json(&destination.join(MARKER_FILE), marker)
}

pub fn read_content_record(destination: &Path) -> Result<ContentRecord> {
    read_json(&destination.join(CONTENT_RECORD_FILE))
}

pub fn is_installed(destination: &Path) -> bool {
    destination.join(MARKER_FILE).is_file()
}

/// Synced, so a marker that survives a crash is never ahead of the record.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec(value).map_err(|e| Error::Metadata {
        path: path.to_path_buf(),
        source: e,
    })?;
    atomic_write(path, &json, AtomicWriteOptions::new().sync(true))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = atomic_read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Metadata {
        path: path.to_path_buf(),
        source: e,
    })
}
