//! Unsupported Operation Tests
//!
//! These tests verify that a host exposing only the minimal contract:
//! - Reports `Unsupported` for every mutating operation
//! - Is never modified on disk by a rejected call
//! - Still serves reads through the adapter

use fs_testing::DirFs;
use sysfs::{adapt, Capabilities, File, FileMode, FsError};
use tests_adapter::{disk_listing, two_file_dir};

/// Test: a read-only directory host has no capabilities
#[test]
fn test_dir_fs_has_no_capabilities() {
    let dir = two_file_dir().unwrap();
    let adapter = adapt(DirFs::new(dir.path()));
    assert_eq!(adapter.capabilities(), Capabilities::empty());
}

/// Test: every mutating operation fails with Unsupported and leaves disk unchanged
#[test]
fn test_mutations_rejected_without_side_effects() {
    let dir = two_file_dir().unwrap();
    let before = disk_listing(dir.path()).unwrap();
    let adapter = adapt(DirFs::new(dir.path()));

    assert_eq!(adapter.mkdir("dir", FileMode::new(0o755)), Err(FsError::Unsupported));
    assert_eq!(adapter.chmod("file1", FileMode::new(0o600)), Err(FsError::Unsupported));
    assert_eq!(adapter.rename("file1", "file3"), Err(FsError::Unsupported));
    assert_eq!(adapter.rmdir("dir"), Err(FsError::Unsupported));
    assert_eq!(adapter.unlink("file2"), Err(FsError::Unsupported));
    assert_eq!(adapter.utimes("file1", 1, 1), Err(FsError::Unsupported));

    assert_eq!(disk_listing(dir.path()).unwrap(), before);
}

/// Test: Unsupported wins even for paths that would be invalid
#[test]
fn test_unsupported_checked_before_path() {
    let dir = two_file_dir().unwrap();
    let adapter = adapt(DirFs::new(dir.path()));

    assert_eq!(adapter.unlink("../file1"), Err(FsError::Unsupported));
    assert_eq!(adapter.mkdir("/abs", FileMode::default()), Err(FsError::Unsupported));
}

/// Test: reads keep working after rejected mutations
#[test]
fn test_reads_after_rejection() {
    let dir = two_file_dir().unwrap();
    let adapter = adapt(DirFs::new(dir.path()));
    let _ = adapter.unlink("file1");

    let mut file = adapter.as_fs().open("file1").unwrap();
    assert_eq!(file.read_to_end().unwrap(), vec![1u8]);
}

/// Test: errno values stay stable for WASI guests
#[test]
fn test_unsupported_errno() {
    let dir = two_file_dir().unwrap();
    let adapter = adapt(DirFs::new(dir.path()));
    let err = adapter.rmdir("file1").unwrap_err();
    assert_eq!(err.errno(), 52);
}

/// Test: the two-file scenario rejects rename and escaping opens alike
#[test]
fn test_two_file_scenario() {
    let dir = two_file_dir().unwrap();
    let before = disk_listing(dir.path()).unwrap();
    let adapter = adapt(DirFs::new(dir.path()));

    assert_eq!(adapter.rename("file1", "file2"), Err(FsError::Unsupported));
    let err = adapter
        .open_file("../foo", sysfs::OpenFlags::READ_ONLY, FileMode::default())
        .unwrap_err();
    assert_eq!(err, FsError::InvalidArgument);

    assert_eq!(disk_listing(dir.path()).unwrap(), before);
}
