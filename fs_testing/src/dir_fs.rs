//! OS directory host
//!
//! A read-only view of a directory tree on disk. It exposes only the minimal
//! contract and is strict about paths: anything that is not already clean is
//! rejected with `InvalidArgument`.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use sysfs::{clean_path, DirEntry, File, FileMode, FileType, Fs, FsError, Stat};

/// A directory tree rooted at a host path
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
    name: String,
}

impl DirFs {
    /// Creates a view rooted at `root`; the identity is `root` as given
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            root: root.to_path_buf(),
            name: root.to_string_lossy().into_owned(),
        }
    }

    /// Returns the host root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a clean guest path to a host path
    pub fn host_path(&self, path: &str) -> Result<PathBuf, FsError> {
        let clean = clean_path(path)?;
        if clean.as_str() != path {
            return Err(FsError::InvalidArgument);
        }
        if clean.is_root() {
            Ok(self.root.clone())
        } else {
            Ok(self.root.join(clean.as_str()))
        }
    }
}

impl Fs for DirFs {
    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
        let host = self.host_path(path)?;
        let file = fs::File::open(&host)?;
        Ok(Box::new(OsFile::new(file, host, base_name(path))))
    }

    fn root_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Final component of a clean path
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// A handle backed by an OS file
///
/// Writes succeed whenever the underlying file was opened writable.
#[derive(Debug)]
pub struct OsFile {
    file: fs::File,
    path: PathBuf,
    name: String,
    listed: bool,
}

impl OsFile {
    /// Wraps an open OS file; `name` is reported by `stat`
    pub fn new(file: fs::File, path: PathBuf, name: &str) -> Self {
        Self {
            file,
            path,
            name: name.to_string(),
            listed: false,
        }
    }
}

impl File for OsFile {
    fn stat(&self) -> Result<Stat, FsError> {
        let meta = self.file.metadata()?;
        let mtime_nanos = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map_err(|_| FsError::Io)?
            .as_nanos() as i64;

        Ok(Stat {
            name: self.name.clone(),
            file_type: file_type(meta.file_type()),
            mode: mode_of(&meta),
            size: meta.len(),
            mtime_nanos,
        })
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        Ok(self.file.read(buf)?)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, FsError> {
        Ok(self.file.write(buf)?)
    }

    fn read_dir(&mut self) -> Result<Vec<DirEntry>, FsError> {
        if !self.file.metadata()?.is_dir() {
            return Err(FsError::NotFound);
        }
        if self.listed {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            entries.push(DirEntry::new(
                entry.file_name().to_string_lossy().into_owned(),
                file_type(entry.file_type()?),
            ));
        }
        entries.sort();
        self.listed = true;
        Ok(entries)
    }
}

fn file_type(ft: fs::FileType) -> FileType {
    if ft.is_dir() {
        FileType::Directory
    } else if ft.is_file() {
        FileType::File
    } else if ft.is_symlink() {
        FileType::Symlink
    } else {
        FileType::Other
    }
}

#[cfg(unix)]
fn mode_of(meta: &fs::Metadata) -> FileMode {
    use std::os::unix::fs::PermissionsExt;
    FileMode::new(meta.permissions().mode())
}

#[cfg(not(unix))]
fn mode_of(meta: &fs::Metadata) -> FileMode {
    if meta.permissions().readonly() {
        FileMode::new(0o444)
    } else {
        FileMode::new(0o666)
    }
}
