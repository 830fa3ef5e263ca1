use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use nupkg_fs::{AtomicWriteOptions, InstallLock, LockMode, atomic_copy, atomic_read, atomic_write, ensure_dir};
use tempfile::tempdir;

#[test]
fn test_atomic_write_basic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.txt");

    atomic_write(&path, b"hello world", AtomicWriteOptions::new()).unwrap();

    assert!(path.exists());
    assert_eq!(atomic_read(&path).unwrap(), b"hello world");
}

#[test]
fn test_atomic_write_replaces_existing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("existing.txt");

    std::fs::write(&path, "original").unwrap();

    let result = atomic_write(&path, b"new content", AtomicWriteOptions::new());

    assert!(result.is_ok());
    assert_eq!(atomic_read(&path).unwrap(), b"new content");
}

#[test]
fn test_atomic_copy_into_created_dir() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("build").join("net452");
    ensure_dir(&nested).unwrap();

    let target = nested.join("xunit.abstractions.dll");
    let written = atomic_copy(&b"MZ\x90\x00"[..], &target, AtomicWriteOptions::new()).unwrap();

    assert_eq!(written, 4);
    assert_eq!(atomic_read(&target).unwrap(), b"MZ\x90\x00");
}

#[test]
fn test_atomic_write_missing_parent_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("file.txt");

    let result = atomic_write(&path, b"data", AtomicWriteOptions::new());

    assert!(matches!(result, Err(nupkg_fs::Error::Write { .. })));
}

#[test]
fn test_waiting_lock_serializes_holders() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".2.4.2.lock");
    let log = dir.path().join("log.txt");
    std::fs::write(&log, "").unwrap();

    let first = InstallLock::acquire(&path, LockMode::Wait).unwrap();
    let barrier = Arc::new(Barrier::new(2));

    let handle = {
        let path = path.clone();
        let log = log.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            let _lock = InstallLock::acquire(&path, LockMode::Wait).unwrap();
            let mut content = std::fs::read_to_string(&log).unwrap();
            content.push_str("second;");
            std::fs::write(&log, content).unwrap();
        })
    };

    barrier.wait();
    thread::sleep(Duration::from_millis(50));
    std::fs::write(&log, "first;").unwrap();
    drop(first);

    handle.join().unwrap();
    assert_eq!(std::fs::read_to_string(&log).unwrap(), "first;second;");
}
