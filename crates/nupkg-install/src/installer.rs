use std::fs::File;
use std::io::Seek;
use std::mem;
use std::path::{Path, PathBuf};

use nupkg_archive::{CancelFlag, ExtractOptions, PackageArchive, ZipPackage, extract};
use nupkg_fs::{InstallLock, LockMode, ensure_dir, remove_stale_temps};
use nupkg_identity::{PackageId, PackageVersion, resolve_install_path};
use nupkg_verify::ContentHash;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::hooks::InstallObserver;
use crate::metadata::{self, ContentRecord, InstallMarker};
use crate::request::InstallRequest;

/// Lifecycle of a single install.
///
/// `NotStarted -> Checking -> Extracting -> WritingMetadata -> Completed`;
/// `Checking` jumps straight to `Completed` when the marker is present, and
/// `Failed` is reachable from any intermediate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    NotStarted,
    Checking,
    Extracting,
    WritingMetadata,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Completed,
    /// The marker was already present; the archive was not opened.
    AlreadyInstalled,
}

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub path: PathBuf,
    pub state: InstallStatus,
    pub files_extracted: usize,
    /// `None` when an existing install carries no readable content record.
    pub record: Option<ContentRecord>,
}

#[derive(Clone, Debug)]
pub struct InstallOptions {
    /// Keep a copy of the archive as `<id>.<version>.nupkg`.
    pub save_archive: bool,
    /// Write `<id>.<version>.nupkg.sha512`.
    pub write_hash_file: bool,
    pub lock: LockMode,
    pub extract: ExtractOptions,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            save_archive: true,
            write_hash_file: true,
            lock: LockMode::Wait,
            extract: ExtractOptions::default(),
        }
    }
}

impl InstallOptions {
    pub fn save_archive(mut self, save: bool) -> Self {
        self.save_archive = save;
        self
    }

    pub fn write_hash_file(mut self, write: bool) -> Self {
        self.write_hash_file = write;
        self
    }

    pub fn lock(mut self, mode: LockMode) -> Self {
        self.lock = mode;
        self
    }

    pub fn extract(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }
}

/// Installs validated requests into the `root/<id>/<version>/` layout.
#[derive(Default)]
pub struct Installer {
    options: InstallOptions,
    observers: Vec<Box<dyn InstallObserver>>,
}

impl Installer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: InstallOptions) -> Self {
        Self {
            options,
            observers: Vec::new(),
        }
    }

    pub fn observer<O: InstallObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Install `request`, or return early if it is already installed.
    ///
    /// Holds the per-version lock from the marker check until the marker is
    /// written. On failure the marker is absent, so calling again redoes the
    /// extraction over whatever was left behind.
    pub fn install(&self, request: &InstallRequest) -> Result<InstallOutcome> {
        self.install_with(request, ZipPackage::from_file)
    }

    /// Like [`Installer::install`], with a custom archive reader.
    ///
    /// `open_archive` receives a handle to the request's archive file and is
    /// only called when extraction is actually needed. The content record
    /// describes the bytes behind that same handle.
    pub fn install_with<A, F>(&self, request: &InstallRequest, open_archive: F) -> Result<InstallOutcome>
    where
        A: PackageArchive,
        F: FnOnce(File) -> nupkg_archive::Result<A>,
    {
        let mut transitions = Transitions {
            observers: &self.observers,
            request,
            state: InstallState::NotStarted,
        };

        match self.run(request, &mut transitions, open_archive) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(
                    id = %request.id(),
                    version = %request.version(),
                    state = ?transitions.state,
                    error = %e,
                    "install failed"
                );
                transitions.advance(InstallState::Failed);
                Err(e)
            }
        }
    }

    fn run<A, F>(
        &self,
        request: &InstallRequest,
        transitions: &mut Transitions<'_>,
        open_archive: F,
    ) -> Result<InstallOutcome>
    where
        A: PackageArchive,
        F: FnOnce(File) -> nupkg_archive::Result<A>,
    {
        transitions.advance(InstallState::Checking);

        let resolver = request.resolver();
        let (id, version) = (request.id(), request.version());
        let install_path = resolver.install_path(id, version);

        ensure_dir(resolver.id_path(id))?;
        let _lock = InstallLock::acquire(resolver.lock_path(id, version), self.options.lock)?;

        if metadata::is_installed(&install_path) {
            debug!(path = %install_path.display(), "install marker present");
            let record = metadata::read_content_record(&install_path).ok();
            transitions.advance(InstallState::Completed);
            return Ok(InstallOutcome {
                path: install_path,
                state: InstallStatus::AlreadyInstalled,
                files_extracted: 0,
                record,
            });
        }

        transitions.advance(InstallState::Extracting);
        let removed = remove_stale_temps(&install_path)?;
        if removed > 0 {
            debug!(path = %install_path.display(), removed, "removed leftovers of an interrupted install");
        }

        let archive_name = resolver.archive_file_name(id, version);
        let hash_name = resolver.hash_file_name(id, version);
        let mut extract_options = self
            .options
            .extract
            .clone()
            .reserve(metadata::MARKER_FILE)
            .reserve(metadata::CONTENT_RECORD_FILE)
            .reserve(archive_name.as_str())
            .reserve(hash_name.as_str());
        if request.signature().is_some() {
            extract_options = extract_options.reserve(metadata::SIGNATURE_FILE);
        }

        let source = request.archive_path();
        let mut file = File::open(source).map_err(|e| Error::io(source, e))?;
        let digest = metadata::hash_archive(&mut file, source)?;
        let report = {
            file.rewind().map_err(|e| Error::io(source, e))?;
            let handle = file.try_clone().map_err(|e| Error::io(source, e))?;
            let mut archive = open_archive(handle)?;
            extract(&mut archive, &install_path, &extract_options)?
        };
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        transitions.advance(InstallState::WritingMetadata);
        if self.options.save_archive {
            metadata::save_archive(&mut file, source, &install_path.join(&archive_name), &digest.hash)?;
        }
        if self.options.write_hash_file {
            metadata::write_hash_file(&install_path.join(&hash_name), &digest.hash)?;
        }
        let record = metadata::write_metadata(&install_path, &digest, report.entry_count, request.signature())?;
        metadata::write_marker(&install_path, &InstallMarker::new(&digest.hash, source))?;

        transitions.advance(InstallState::Completed);
        info!(
            id = %id,
            version = %version,
            path = %install_path.display(),
            files = report.files_extracted,
            "package installed"
        );

        Ok(InstallOutcome {
            path: install_path,
            state: InstallStatus::Completed,
            files_extracted: report.files_extracted,
            record: Some(record),
        })
    }

    /// Re-hash the request's archive and compare it with the recorded digest.
    pub fn verify(&self, request: &InstallRequest) -> Result<ContentRecord> {
        let install_path = request.install_path();
        if !metadata::is_installed(&install_path) {
            return Err(Error::NotInstalled { path: install_path });
        }

        let record = metadata::read_content_record(&install_path)?;
        let expected = ContentHash::from_base64(&record.content_hash)
            .map_err(|e| Error::verification(install_path.join(metadata::CONTENT_RECORD_FILE), e))?;

        let source = request.archive_path();
        let mut file = File::open(source).map_err(|e| Error::io(source, e))?;
        if let Err(e) = metadata::verify_archive(&mut file, source, &expected) {
            warn!(
                id = %request.id(),
                version = %request.version(),
                path = %install_path.display(),
                error = %e,
                "archive differs from installed content"
            );
            return Err(e);
        }
        Ok(record)
    }

    pub fn is_installed(root: impl AsRef<Path>, id: &PackageId, version: &PackageVersion) -> bool {
        metadata::is_installed(&resolve_install_path(root, id, version))
    }

    fn is_cancelled(&self) -> bool {
        self.options.extract.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

struct Transitions<'a> {
    observers: &'a [Box<dyn InstallObserver>],
    request: &'a InstallRequest,
    state: InstallState,
}

impl Transitions<'_> {
    fn advance(&mut self, to: InstallState) {
        let from = mem::replace(&mut self.state, to);
        info!(
            id = %self.request.id(),
            version = %self.request.version(),
            ?from,
            ?to,
            "install state changed"
        );
        for observer in self.observers {
            debug!(observer = observer.name(), ?to, "notifying observer");
            observer.on_transition(self.request, from, to);
        }
    }
}
