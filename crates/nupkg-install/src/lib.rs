//! Installs `.nupkg` archives into a `root/<id>/<version>/` folder layout.
//!
//! - `request` - validation of raw install input
//! - `installer` - the locked, idempotent install state machine
//! - `metadata` - content record, archive hash and install marker files
//! - `hooks` - observers of install state transitions
//!
//! ```no_run
//! use nupkg_install::{InstallRequest, Installer};
//!
//! let request = InstallRequest::validate(&["test.2.4.2.nupkg", "packages", "test", "2.4.2"])?;
//! let outcome = Installer::new().install(&request)?;
//! println!("installed to {}", outcome.path.display());
//! # Ok::<(), nupkg_install::Error>(())
//! ```

pub use error::{ConfigurationError, Error, ErrorKind, Result};
pub use hooks::InstallObserver;
pub use installer::{InstallOptions, InstallOutcome, InstallState, InstallStatus, Installer};
pub use metadata::{ContentRecord, InstallMarker};
pub use request::{InstallRequest, validate_install_request};

pub use nupkg_archive::{CancelFlag, ExtractOptions};
pub use nupkg_fs::LockMode;
pub use nupkg_identity::{PackageId, PackageVersion};

mod error;
pub mod hooks;
mod installer;
pub mod metadata;
mod request;
