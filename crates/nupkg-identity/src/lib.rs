//! Package identity and install-path resolution.
//!
//! # Layout
//!
//! A package `Foo.Bar` at version `2.4.2` installed into `root` lives at
//! `root/foo.bar/2.4.2/`. The id is lowercased and the version normalized, so
//! the directory is a pure function of `(root, id, version)`.

pub use self::id::{ID_PATTERN, InvalidIdError, PackageId};
pub use self::path::{VersionFolderPathResolver, resolve_install_path};
pub use self::version::{InvalidVersionError, PackageVersion};

mod id;
mod path;
mod version;
