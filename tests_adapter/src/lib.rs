//! Adapter Test Utilities
//!
//! This crate provides shared helpers for the adapter integration tests.
//!
//! ## Test Philosophy
//!
//! - **Real hosts**: scenarios run against directories on disk, not mocks
//! - **Nothing touched**: unsupported operations must leave the disk unchanged
//! - **Tolerance**: hosts that give out more than the minimal contract promises
//!   must keep working through the adapter

use fs_testing::dir_fs::base_name;
use fs_testing::OsFile;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use sysfs::{File, Fs, FsError};
use tempfile::TempDir;

/// A host that breaks the read-only promise of the minimal contract
///
/// Files are opened read-write, missing files are created, and directories
/// fall back to read-only. Some embedders rely on this, so the adapter must
/// keep passing such handles through.
#[derive(Debug, Clone)]
pub struct HackFs {
    root: PathBuf,
    name: String,
}

impl HackFs {
    /// Creates a host rooted at `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            root: root.to_path_buf(),
            name: root.to_string_lossy().into_owned(),
        }
    }
}

impl Fs for HackFs {
    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
        let host = self.root.join(path);
        let file = match OpenOptions::new().read(true).write(true).open(&host) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::IsADirectory => fs::File::open(&host)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .open(&host)?,
            Err(err) => return Err(err.into()),
        };
        Ok(Box::new(OsFile::new(file, host, base_name(path))))
    }

    fn root_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Creates a temp dir holding `file1` (byte 1) and `file2` (byte 2)
pub fn two_file_dir() -> io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("file1"), [1u8])?;
    fs::write(dir.path().join("file2"), [2u8])?;
    Ok(dir)
}

/// Creates `<tmp>/<name>` so paths escaping the root land on real files
///
/// A file named `foo` is written next to the returned root.
pub fn nested_root(name: &str) -> io::Result<(TempDir, PathBuf)> {
    let outer = tempfile::tempdir()?;
    fs::write(outer.path().join("foo"), b"outside")?;
    let root = outer.path().join(name);
    fs::create_dir(&root)?;
    Ok((outer, root))
}

/// Recursively records every path under `dir` with file contents
///
/// Directories map to `None`. Used to prove a tree was left unchanged.
pub fn disk_listing(dir: &Path) -> io::Result<BTreeMap<String, Option<Vec<u8>>>> {
    let mut out = BTreeMap::new();
    let mut pending = vec![PathBuf::new()];
    while let Some(rel) = pending.pop() {
        for entry in fs::read_dir(dir.join(&rel))? {
            let entry = entry?;
            let child = rel.join(entry.file_name());
            let key = child.to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() {
                out.insert(key, None);
                pending.push(child);
            } else {
                out.insert(key, Some(fs::read(entry.path())?));
            }
        }
    }
    Ok(out)
}
