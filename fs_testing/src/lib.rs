//! # Filesystem Test Hosts
//!
//! This crate provides host filesystems and a compliance suite for exercising
//! the adapter against the minimal contract.
//!
//! ## Philosophy
//!
//! - **Hosts are collaborators, not the subject**: they exist so the adapter can
//!   be checked against real behaviour
//! - **Both ends of the spectrum**: a strict on-disk host exposing nothing but
//!   `open`, and an in-memory host that can expose every capability
//! - **Same tree everywhere**: the canonical test tree exists on disk and in
//!   memory so results can be compared directly
//!
//! ## Structure
//!
//! - [`DirFs`]: read-only view of a host directory
//! - [`MapFs`]: in-memory tree, minimal or fully writable
//! - [`CountingFs`]: spy counting opens that reach the wrapped host
//! - [`check_fs`] / [`snapshot`]: the compliance suite

pub mod compliance;
pub mod counting;
pub mod dir_fs;
pub mod map_fs;
pub mod testdata;

pub use compliance::{check_fs, snapshot, ComplianceError, Node, Snapshot};
pub use counting::CountingFs;
pub use dir_fs::{DirFs, OsFile};
pub use map_fs::{MapFile, MapFs};
pub use testdata::{expected_paths, test_map_fs, write_test_files, ANIMALS, TEST_DIRS, TEST_FILES};
