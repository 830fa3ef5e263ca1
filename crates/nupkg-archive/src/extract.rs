use std::path::Path;

use nupkg_fs::{AtomicWriteOptions, atomic_copy, ensure_dir};
use tracing::debug;

use crate::entry::{Entry, EntryKind, ExtractReport};
use crate::error::{Error, Result};
use crate::options::{ExtractOptions, Progress};
use crate::sanitize::{SanitizedPath, sanitize_entry_name};
use crate::package::PackageArchive;

/// Extract every entry of `archive` under `destination`.
///
/// All entry names are resolved before anything touches the filesystem, so an
/// archive carrying a single escaping name fails with
/// [`Error::PathTraversal`] and leaves `destination` exactly as it was.
/// Each file is then written through a temporary sibling and renamed into
/// place; an interrupted extraction may leave some complete files but never a
/// truncated one.
pub fn extract<A: PackageArchive + ?Sized>(
    archive: &mut A,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let destination = destination.as_ref();
    let names = archive.entry_names();

    let planned = names
        .iter()
        .map(|name| sanitize_entry_name(name, destination))
        .collect::<Result<Vec<_>>>()?;

    ensure_dir(destination)?;

    let total_entries = planned.len();
    let mut report = ExtractReport {
        entry_count: total_entries,
        ..ExtractReport::default()
    };

    for (index, path) in planned.into_iter().enumerate() {
        if options.is_cancelled() {
            debug!(path = %destination.display(), processed = index, "extraction cancelled");
            return Err(Error::Cancelled);
        }

        let entry = extract_entry(archive, &path, options)?;
        if entry.is_file() {
            report.files_extracted += 1;
            report.total_bytes += entry.size;
        }

        if let Some(ref callback) = options.on_progress {
            callback(Progress {
                entries_processed: index + 1,
                total_entries,
                bytes_written: report.total_bytes,
                current_entry: entry.name.clone(),
            });
        }
        report.entries.push(entry);
    }

    debug!(
        path = %destination.display(),
        entries = report.entry_count,
        files = report.files_extracted,
        "extraction finished"
    );
    Ok(report)
}

fn extract_entry<A: PackageArchive + ?Sized>(
    archive: &mut A,
    path: &SanitizedPath,
    options: &ExtractOptions,
) -> Result<Entry> {
    let relative = path.relative.to_string_lossy();
    let entry = |kind, size| Entry {
        name: path.original.clone(),
        target_path: path.resolved.clone(),
        size,
        kind,
    };

    if options.is_skipped(&relative) {
        debug!(entry = %path.original, "skipping entry");
        return Ok(entry(EntryKind::Skipped, 0));
    }

    if path.is_dir {
        ensure_dir(&path.resolved)?;
        return Ok(entry(EntryKind::Directory, 0));
    }

    if let Some(parent) = path.resolved.parent() {
        ensure_dir(parent)?;
    }

    let reader = archive.open_entry(&path.original)?;
    let size = atomic_copy(reader, &path.resolved, AtomicWriteOptions::new()).map_err(|e| match e {
        nupkg_fs::Error::Source { source, .. } => Error::EntryRead {
            entry: path.original.clone(),
            source,
        },
        other => Error::Fs(other),
    })?;

    debug!(entry = %path.original, path = %path.resolved.display(), size, "extracted entry");
    Ok(entry(EntryKind::File, size))
}
