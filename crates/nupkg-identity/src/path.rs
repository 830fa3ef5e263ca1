use std::path::{Path, PathBuf};

use crate::{PackageId, PackageVersion};

/// Resolves the version-folder layout `root/<id>/<version>/` and the names of
/// the files that live next to the extracted contents.
///
/// Never touches the filesystem.
#[derive(Debug, Clone)]
pub struct VersionFolderPathResolver {
    root: PathBuf,
}

impl VersionFolderPathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `root/<lowercase id>`
    pub fn id_path(&self, id: &PackageId) -> PathBuf {
        self.root.join(id.to_lowercase())
    }

    /// `root/<lowercase id>/<normalized version>`
    pub fn install_path(&self, id: &PackageId, version: &PackageVersion) -> PathBuf {
        self.id_path(id).join(version.to_string())
    }

    /// Lock file guarding one install, placed beside the version folder.
    pub fn lock_path(&self, id: &PackageId, version: &PackageVersion) -> PathBuf {
        self.id_path(id).join(format!(".{version}.lock"))
    }

    /// `<lowercase id>.<normalized version>.nupkg`
    pub fn archive_file_name(&self, id: &PackageId, version: &PackageVersion) -> String {
        format!("{}.{}.nupkg", id.to_lowercase(), version)
    }

    /// `<lowercase id>.<normalized version>.nupkg.sha512`
    pub fn hash_file_name(&self, id: &PackageId, version: &PackageVersion) -> String {
        format!("{}.sha512", self.archive_file_name(id, version))
    }
}

/// Canonical install directory for `(root, id, version)`.
pub fn resolve_install_path(root: impl AsRef<Path>, id: &PackageId, version: &PackageVersion) -> PathBuf {
    VersionFolderPathResolver::new(root.as_ref()).install_path(id, version)
}
