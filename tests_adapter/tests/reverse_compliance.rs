//! Reverse Compliance Tests
//!
//! These tests verify that an adapter viewed as a minimal host:
//! - Passes the compliance suite for disk and in-memory hosts
//! - Serves exactly the same tree as the host it wraps

use fs_testing::{check_fs, expected_paths, snapshot, test_map_fs, write_test_files, DirFs};
use sysfs::{adapt, Fs};

/// Test: adapted directory host passes the compliance suite
#[test]
fn test_adapted_dir_fs_is_compliant() {
    let dir = tempfile::tempdir().unwrap();
    write_test_files(dir.path()).unwrap();
    let adapter = adapt(DirFs::new(dir.path()));

    check_fs(adapter.as_fs(), &expected_paths()).unwrap();
}

/// Test: adapted in-memory host passes the compliance suite
#[test]
fn test_adapted_map_fs_is_compliant() {
    let adapter = adapt(test_map_fs().unwrap());
    check_fs(adapter.as_fs(), &expected_paths()).unwrap();
}

/// Test: the adapter adds nothing to and hides nothing from the tree
#[test]
fn test_adapted_snapshot_matches_host() {
    let dir = tempfile::tempdir().unwrap();
    write_test_files(dir.path()).unwrap();
    let host = DirFs::new(dir.path());
    let adapter = adapt(host.clone());

    assert_eq!(snapshot(adapter.as_fs()).unwrap(), snapshot(&host).unwrap());
}

/// Test: the reverse view keeps the host identity
#[test]
fn test_reverse_view_identity() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = adapt(DirFs::new(dir.path()));
    let expected = dir.path().to_string_lossy().into_owned();
    assert_eq!(adapter.as_fs().root_name(), Some(expected.as_str()));
}
