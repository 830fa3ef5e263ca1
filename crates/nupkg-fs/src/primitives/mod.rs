pub mod atomic_write;

pub use atomic_write::{atomic_copy, atomic_read, atomic_write, ensure_dir, remove_stale_temps, AtomicWriteOptions};
