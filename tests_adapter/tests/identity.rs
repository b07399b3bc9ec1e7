//! Identity Tests
//!
//! These tests verify that the adapter reports the identity of its host.

use fs_testing::{DirFs, MapFs};
use sysfs::{adapt, UNNAMED_ROOT};

/// Test: a directory host rooted at "." is named "."
#[test]
fn test_dir_fs_dot_identity() {
    let adapter = adapt(DirFs::new("."));
    assert_eq!(adapter.name(), ".");
    assert_eq!(adapter.to_string(), ".");
}

/// Test: hosts without an identity get the placeholder
#[test]
fn test_unnamed_host() {
    assert_eq!(adapt(MapFs::new()).name(), UNNAMED_ROOT);
}

/// Test: identity survives cloning and rewrapping
#[test]
fn test_identity_survives_rewrap() {
    let adapter = adapt(MapFs::new().with_name("mem"));
    let rewrapped = adapt(adapter.clone());
    assert_eq!(adapter.clone().name(), "mem");
    assert_eq!(rewrapped.name(), "mem");
}
