//! Reading `.nupkg` archives and extracting them safely.
//!
//! - `package` - the [`PackageArchive`] abstraction and its ZIP implementation
//! - `sanitize` - lexical resolution of entry names (zip-slip prevention)
//! - `extract` - two-pass extraction: validate every name, then write
//! - `options` - packaging-part skipping, cancellation, progress

pub use entry::{Entry, EntryKind, ExtractReport};
pub use error::{Error, Result};
pub use extract::extract;
pub use options::{CancelFlag, ExtractOptions, Progress, is_packaging_part};
pub use sanitize::{SanitizedPath, sanitize_entry_name};
pub use package::{PackageArchive, ZipPackage};

pub mod entry;
mod error;
mod extract;
pub mod options;
mod package;
mod sanitize;
