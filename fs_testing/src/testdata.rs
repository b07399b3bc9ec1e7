//! Canonical test tree
//!
//! The same tree is available on disk ([`write_test_files`]) and in memory
//! ([`test_map_fs`]) so both kinds of host can be checked against identical
//! expectations.

use crate::map_fs::{MapFile, MapFs};
use std::fs;
use std::io;
use std::path::Path;
use sysfs::FsError;

/// Contents of `animals.txt`
pub const ANIMALS: &str = "bear\ncat\nshark\ndinosaur\nhuman\n";

/// Regular files in the test tree, with contents
pub const TEST_FILES: &[(&str, &str)] = &[
    ("empty.txt", ""),
    ("animals.txt", ANIMALS),
    ("sub/test.txt", "greet sub dir\n"),
    ("dir/-", "-"),
    ("dir/a-", "A-"),
    ("dir/a", "A"),
    ("dir/ab-", "AB-"),
];

/// Directories in the test tree, including empty ones
pub const TEST_DIRS: &[&str] = &["emptydir", "sub", "dir"];

/// Paths every compliant host serving the test tree must list
pub fn expected_paths() -> Vec<&'static str> {
    TEST_FILES.iter().map(|(path, _)| *path).collect()
}

/// Writes the test tree under `dir`
pub fn write_test_files(dir: &Path) -> io::Result<()> {
    for sub in TEST_DIRS {
        fs::create_dir_all(dir.join(sub))?;
    }
    for (path, contents) in TEST_FILES {
        fs::write(dir.join(path), contents)?;
    }
    Ok(())
}

/// Builds the test tree as a minimal in-memory host
pub fn test_map_fs() -> Result<MapFs, FsError> {
    let fs = MapFs::new();
    for sub in TEST_DIRS {
        fs.insert(sub, MapFile::dir())?;
    }
    for (path, contents) in TEST_FILES {
        fs.insert(path, MapFile::file(*contents))?;
    }
    Ok(fs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysfs::{File, Fs};
    use tempfile::tempdir;

    #[test]
    fn test_write_test_files() {
        let dir = tempdir().unwrap();
        write_test_files(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("animals.txt")).unwrap(), ANIMALS);
        assert!(dir.path().join("emptydir").is_dir());
    }

    #[test]
    fn test_map_fs_matches_listing() {
        let fs = test_map_fs().unwrap();
        assert!(fs.as_mkdir().is_none());
        let mut file = fs.open("sub/test.txt").unwrap();
        assert_eq!(file.read_to_end().unwrap(), b"greet sub dir\n");
        assert!(fs.open("emptydir").unwrap().stat().unwrap().is_dir());
    }
}
