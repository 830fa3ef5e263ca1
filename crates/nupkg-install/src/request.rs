use std::fs::File;
use std::path::{Path, PathBuf};

use nupkg_identity::{PackageId, PackageVersion, VersionFolderPathResolver};

use crate::error::ConfigurationError;

/// A validated install request.
///
/// Only obtainable through [`InstallRequest::validate`] or
/// [`validate_install_request`], so every instance names a readable archive,
/// an existing root, a well-formed id and a parseable version.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    archive_path: PathBuf,
    install_root: PathBuf,
    id: PackageId,
    version: PackageVersion,
    signature: Option<Vec<u8>>,
}

impl InstallRequest {
    /// Validate positional arguments: archive path, install root, id, version.
    ///
    /// The argument count is checked before anything touches the filesystem.
    pub fn validate<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigurationError> {
        match args {
            [archive, root, id, version] => {
                validate_install_request(archive.as_ref(), root.as_ref(), id.as_ref(), version.as_ref())
            }
            _ => Err(ConfigurationError::ArgumentCount { given: args.len() }),
        }
    }

    /// Attach an opaque provenance blob, persisted verbatim as `.signature.p7s`.
    pub fn with_signature(mut self, signature: impl Into<Vec<u8>>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn id(&self) -> &PackageId {
        &self.id
    }

    pub fn version(&self) -> &PackageVersion {
        &self.version
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    pub fn resolver(&self) -> VersionFolderPathResolver {
        VersionFolderPathResolver::new(&self.install_root)
    }

    /// `install_root/<lowercase id>/<normalized version>`
    pub fn install_path(&self) -> PathBuf {
        self.resolver().install_path(&self.id, &self.version)
    }
}

/// Checks run in order; the first failure is returned and later checks are skipped.
pub fn validate_install_request(
    archive_path: &str,
    install_root: &str,
    id: &str,
    version: &str,
) -> Result<InstallRequest, ConfigurationError> {
    if !is_readable_file(Path::new(archive_path)) {
        return Err(ConfigurationError::ArchivePath(archive_path.to_string()));
    }
    if !Path::new(install_root).is_dir() {
        return Err(ConfigurationError::InstallRoot(install_root.to_string()));
    }
    let id = PackageId::parse(id).map_err(|e| ConfigurationError::PackageId(e.0))?;
    let version = PackageVersion::parse(version).map_err(|e| ConfigurationError::Version(e.0))?;

    Ok(InstallRequest {
        archive_path: PathBuf::from(archive_path),
        install_root: PathBuf::from(install_root),
        id,
        version,
        signature: None,
    })
}

fn is_readable_file(path: &Path) -> bool {
    File::open(path)
        .and_then(|file| file.metadata())
        .is_ok_and(|metadata| metadata.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        archive: String,
        root: String,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("test.2.4.2.nupkg");
        fs::write(&archive, b"PK").unwrap();
        let root = dir.path().join("packages");
        fs::create_dir(&root).unwrap();
        Fixture {
            archive: archive.to_string_lossy().into_owned(),
            root: root.to_string_lossy().into_owned(),
            dir,
        }
    }

    #[test]
    fn valid_request() {
        let f = fixture();
        let request = InstallRequest::validate(&[f.archive.as_str(), f.root.as_str(), "Test", "2.4.2"]).unwrap();
        assert_eq!(request.id().to_string(), "Test");
        assert_eq!(request.version().to_string(), "2.4.2");
        assert_eq!(request.install_path(), f.dir.path().join("packages").join("test").join("2.4.2"));
        assert!(request.signature().is_none());
    }

    #[test]
    fn wrong_arity_checked_first() {
        for args in [vec![], vec!["/does/not/exist"], vec!["a", "b", "c", "d", "e"]] {
            assert_eq!(
                InstallRequest::validate(&args[..]).unwrap_err(),
                ConfigurationError::ArgumentCount { given: args.len() }
            );
        }
    }

    #[test]
    fn missing_archive_reported_before_other_fields() {
        let err = InstallRequest::validate(&["/does/not/exist.nupkg", "/also/missing", "test.", "bad"]).unwrap_err();
        assert_eq!(err, ConfigurationError::ArchivePath("/does/not/exist.nupkg".into()));
    }

    #[test]
    fn archive_must_be_a_file() {
        let f = fixture();
        let err = InstallRequest::validate(&[f.root.as_str(), f.root.as_str(), "test", "1.0"]).unwrap_err();
        assert_eq!(err, ConfigurationError::ArchivePath(f.root.clone()));
    }

    #[test]
    fn root_must_be_a_directory() {
        let f = fixture();
        let err = InstallRequest::validate(&[f.archive.as_str(), f.archive.as_str(), "test", "1.0"]).unwrap_err();
        assert_eq!(err, ConfigurationError::InstallRoot(f.archive.clone()));
    }

    #[test]
    fn invalid_id() {
        let f = fixture();
        let err = InstallRequest::validate(&[f.archive.as_str(), f.root.as_str(), "test.", "invalidVersion"]).unwrap_err();
        assert_eq!(err, ConfigurationError::PackageId("test.".into()));
    }

    #[test]
    fn invalid_version() {
        let f = fixture();
        let err = InstallRequest::validate(&[f.archive.as_str(), f.root.as_str(), "test", "invalidVersion"]).unwrap_err();
        assert_eq!(err, ConfigurationError::Version("invalidVersion".into()));
    }

    #[test]
    fn signature_attached() {
        let f = fixture();
        let request = validate_install_request(&f.archive, &f.root, "test", "1.0")
            .unwrap()
            .with_signature(b"p7s".to_vec());
        assert_eq!(request.signature(), Some(&b"p7s"[..]));
    }
}
