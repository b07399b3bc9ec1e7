//! Minimal-contract compliance suite
//!
//! Walks any [`Fs`] from its root and checks the invariants every host must
//! keep: listings are sorted and consumed once, listed types match opened
//! types, contents are stable across opens, stat agrees with what was read,
//! and escaping paths are rejected.

use std::collections::BTreeMap;
use sysfs::path::ROOT;
use sysfs::{clean_path, CleanPath, DirEntry, File, FileType, Fs, FsError, Stat};
use thiserror::Error;

/// A violation of the minimal contract
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComplianceError {
    /// An operation that must succeed failed
    #[error("{op} {path}: {source}")]
    Op {
        /// Operation name
        op: &'static str,
        /// Path involved
        path: String,
        /// Error returned by the host
        source: FsError,
    },

    /// Listing and opened handle disagree on the kind of object
    #[error("{path}: listed as {listed:?} but opened as {opened:?}")]
    TypeMismatch {
        /// Path involved
        path: String,
        /// Type in the parent listing
        listed: FileType,
        /// Type reported by stat
        opened: FileType,
    },

    /// Stat reports a different base name than the listing
    #[error("{path}: stat name {actual:?}, expected {expected:?}")]
    NameMismatch {
        /// Path involved
        path: String,
        /// Name from the listing
        expected: String,
        /// Name from stat
        actual: String,
    },

    /// Directory entries out of order or duplicated
    #[error("{0}: listing is not sorted or has duplicates")]
    UnsortedListing(String),

    /// A directory listed entries again after being fully read
    #[error("{0}: second read_dir returned entries")]
    RepeatedListing(String),

    /// Two opens of the same file returned different bytes
    #[error("{0}: contents differ between opens")]
    ContentMismatch(String),

    /// Two opens of the same file returned different metadata
    #[error("{0}: stat differs between opens")]
    StatMismatch(String),

    /// Stat size disagrees with the bytes read
    #[error("{path}: stat size {stat} but read {read} bytes")]
    SizeMismatch {
        /// Path involved
        path: String,
        /// Size from stat
        stat: u64,
        /// Bytes actually read
        read: u64,
    },

    /// An expected file was not found by the walk
    #[error("{0}: expected file not found")]
    Missing(String),

    /// A path outside the root was not rejected with InvalidArgument
    #[error("{0}: escaping path was not rejected")]
    EscapeAccepted(String),
}

/// One walked object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Metadata from the first open
    pub stat: Stat,
    /// File contents (None for directories)
    pub contents: Option<Vec<u8>>,
    /// Directory entries (empty for files)
    pub entries: Vec<DirEntry>,
}

/// Everything reachable from the root, keyed by clean path
pub type Snapshot = BTreeMap<String, Node>;

fn op<T>(op: &'static str, path: &str, result: Result<T, FsError>) -> Result<T, ComplianceError> {
    result.map_err(|source| ComplianceError::Op {
        op,
        path: path.to_string(),
        source,
    })
}

/// Runs the compliance suite; `expected` lists files that must be present
pub fn check_fs(fs: &dyn Fs, expected: &[&str]) -> Result<(), ComplianceError> {
    let snapshot = snapshot(fs)?;

    for path in expected {
        match snapshot.get(*path) {
            Some(node) if node.contents.is_some() => {}
            _ => return Err(ComplianceError::Missing(path.to_string())),
        }
    }

    let first = expected.first().copied().unwrap_or("x");
    for escaping in ["..".to_string(), format!("../{first}"), format!("/{first}")] {
        if !matches!(fs.open(&escaping), Err(FsError::InvalidArgument)) {
            return Err(ComplianceError::EscapeAccepted(escaping));
        }
    }
    Ok(())
}

/// Walks the whole tree, checking invariants on the way
pub fn snapshot(fs: &dyn Fs) -> Result<Snapshot, ComplianceError> {
    let mut out = Snapshot::new();
    let root = op("clean", ROOT, clean_path(ROOT))?;
    let mut pending = vec![(root, DirEntry::new(ROOT, FileType::Directory))];

    while let Some((path, listed)) = pending.pop() {
        let mut file = op("open", &path, fs.open(&path))?;
        let stat = op("stat", &path, file.stat())?;
        check_listed(&path, &listed, &stat)?;

        if stat.is_dir() {
            let entries = walk_dir(&path, &mut *file)?;
            for entry in &entries {
                let child = op("join", &path, path.join(&entry.name))?;
                pending.push((child, entry.clone()));
            }
            out.insert(
                path.to_string(),
                Node {
                    stat,
                    contents: None,
                    entries,
                },
            );
        } else {
            let contents = read_file(fs, &path, &mut *file, &stat)?;
            out.insert(
                path.to_string(),
                Node {
                    stat,
                    contents: Some(contents),
                    entries: Vec::new(),
                },
            );
        }
    }
    Ok(out)
}

fn check_listed(path: &CleanPath, listed: &DirEntry, stat: &Stat) -> Result<(), ComplianceError> {
    if stat.file_type != listed.file_type {
        return Err(ComplianceError::TypeMismatch {
            path: path.to_string(),
            listed: listed.file_type,
            opened: stat.file_type,
        });
    }
    if stat.name != listed.name {
        return Err(ComplianceError::NameMismatch {
            path: path.to_string(),
            expected: listed.name.clone(),
            actual: stat.name.clone(),
        });
    }
    Ok(())
}

fn walk_dir(path: &CleanPath, dir: &mut dyn File) -> Result<Vec<DirEntry>, ComplianceError> {
    let entries = op("read_dir", path, dir.read_dir())?;
    if entries.windows(2).any(|pair| pair[0].name >= pair[1].name) {
        return Err(ComplianceError::UnsortedListing(path.to_string()));
    }
    if !op("read_dir", path, dir.read_dir())?.is_empty() {
        return Err(ComplianceError::RepeatedListing(path.to_string()));
    }
    Ok(entries)
}

fn read_file(
    fs: &dyn Fs,
    path: &CleanPath,
    file: &mut dyn File,
    stat: &Stat,
) -> Result<Vec<u8>, ComplianceError> {
    let contents = op("read", path, file.read_to_end())?;
    if stat.file_type == FileType::File && stat.size != contents.len() as u64 {
        return Err(ComplianceError::SizeMismatch {
            path: path.to_string(),
            stat: stat.size,
            read: contents.len() as u64,
        });
    }

    let mut again = op("open", path, fs.open(path))?;
    if op("stat", path, again.stat())? != *stat {
        return Err(ComplianceError::StatMismatch(path.to_string()));
    }
    if op("read", path, again.read_to_end())? != contents {
        return Err(ComplianceError::ContentMismatch(path.to_string()));
    }
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{expected_paths, test_map_fs};
    use crate::{MapFile, MapFs};

    #[test]
    fn test_map_fs_is_compliant() {
        let fs = test_map_fs().unwrap();
        check_fs(&fs, &expected_paths()).unwrap();
    }

    #[test]
    fn test_snapshot_contents() {
        let fs = test_map_fs().unwrap();
        let snapshot = snapshot(&fs).unwrap();
        assert_eq!(
            snapshot["sub/test.txt"].contents.as_deref(),
            Some(&b"greet sub dir\n"[..])
        );
        assert!(snapshot["emptydir"].entries.is_empty());
        assert_eq!(snapshot["."].stat.name, ".");
    }

    #[test]
    fn test_missing_expected_file() {
        let fs = MapFs::new().with("a", MapFile::file("1")).unwrap();
        assert_eq!(
            check_fs(&fs, &["a", "b"]),
            Err(ComplianceError::Missing("b".to_string()))
        );
    }

    struct Lax(MapFs);

    impl Fs for Lax {
        fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
            let trimmed = path.trim_start_matches("../").trim_start_matches('/');
            self.0.open(if trimmed.is_empty() || trimmed == ".." { ROOT } else { trimmed })
        }
    }

    #[test]
    fn test_escape_detected() {
        let fs = Lax(MapFs::new().with("a", MapFile::file("1")).unwrap());
        assert_eq!(
            check_fs(&fs, &["a"]),
            Err(ComplianceError::EscapeAccepted("..".to_string()))
        );
    }
}
