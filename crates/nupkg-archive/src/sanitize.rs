use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Result of resolving an archive entry name against a destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedPath {
    pub original: String,
    /// Lexically normalized path relative to the destination.
    pub relative: PathBuf,
    pub resolved: PathBuf,
    pub is_dir: bool,
}

/// Resolve an archive entry name under `base`.
///
/// Both `/` and `\` separate components. Resolution is purely lexical and
/// never follows symlinks. Any name that would land outside `base` fails
/// with [`Error::PathTraversal`]; nothing is rewritten into a safe location.
pub fn sanitize_entry_name(name: &str, base: &Path) -> Result<SanitizedPath> {
    if name.is_empty() || name.contains('\0') {
        return Err(Error::InvalidPath {
            entry: name.to_string(),
        });
    }

    let traversal = |resolved: PathBuf| Error::PathTraversal {
        entry: name.to_string(),
        resolved,
    };

    if is_absolute(name) {
        return Err(traversal(PathBuf::from(name)));
    }

    let is_dir = name.ends_with(['/', '\\']);
    let mut segments: Vec<&str> = Vec::new();

    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(traversal(escaped_path(base, name)));
                }
            }
            // A drive or stream designator mid-path would re-root the join on Windows.
            s if s.contains(':') => {
                return Err(Error::InvalidPath {
                    entry: name.to_string(),
                });
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() && !is_dir {
        return Err(Error::InvalidPath {
            entry: name.to_string(),
        });
    }

    let relative: PathBuf = segments.iter().collect();
    let resolved = base.join(&relative);

    if !resolved.starts_with(base) {
        return Err(traversal(resolved));
    }

    Ok(SanitizedPath {
        original: name.to_string(),
        relative,
        resolved,
        is_dir,
    })
}

fn is_absolute(name: &str) -> bool {
    let bytes = name.as_bytes();
    name.starts_with(['/', '\\']) || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Best-effort description of where an escaping entry would have landed,
/// used only for error reporting.
fn escaped_path(base: &Path, name: &str) -> PathBuf {
    let mut result = base.to_path_buf();
    for segment in name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                result.pop();
            }
            s => result.push(s),
        }
    }
    result
}
