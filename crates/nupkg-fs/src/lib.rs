//! Filesystem primitives for placing package contents on disk.
//!
//! - `primitives` - temp-file-then-rename writes with leftover cleanup; idempotent directory creation
//! - `lock` - OS-level exclusive advisory locks scoped to one install

mod error;
mod lock;
pub mod primitives;

pub use error::{Error, Result};
pub use lock::{InstallLock, LockMode};
pub use primitives::{atomic_copy, atomic_read, atomic_write, ensure_dir, remove_stale_temps, AtomicWriteOptions};
