//! File handles and metadata
//!
//! Handles returned by open operations are owned by the caller and released
//! on drop. The adapter never tracks or wraps them.

use crate::error::FsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of object a path names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// Anything else (device, socket, fifo)
    Other,
}

/// Permission bits (the low 12 bits of a POSIX mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FileMode(pub u32);

impl FileMode {
    /// Mask of the bits this type keeps
    pub const PERM_MASK: u32 = 0o7777;

    /// Creates a mode, discarding file-type bits
    pub const fn new(bits: u32) -> Self {
        Self(bits & Self::PERM_MASK)
    }

    /// Returns the permission bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if any write bit is set
    pub const fn is_writable(self) -> bool {
        self.0 & 0o222 != 0
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

/// Metadata of an opened handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Base name of the object ("." for the root)
    pub name: String,
    /// Object kind
    pub file_type: FileType,
    /// Permission bits
    pub mode: FileMode,
    /// Size in bytes (0 for directories on hosts that don't track it)
    pub size: u64,
    /// Modification time, nanoseconds since the Unix epoch
    pub mtime_nanos: i64,
}

impl Stat {
    /// Returns true if this names a directory
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

/// A single directory listing entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name, never containing '/'
    pub name: String,
    /// Object kind
    pub file_type: FileType,
}

impl DirEntry {
    /// Creates a new directory entry
    pub fn new(name: impl Into<String>, file_type: FileType) -> Self {
        Self {
            name: name.into(),
            file_type,
        }
    }
}

/// An open file or directory
///
/// The minimal contract only promises `stat` and `read`. Hosts may also
/// support `write` and `read_dir`; the defaults report
/// [`FsError::Unsupported`].
pub trait File: Send {
    /// Returns metadata for the open object
    fn stat(&self) -> Result<Stat, FsError>;

    /// Reads into `buf`, returning the number of bytes read (0 at EOF)
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError>;

    /// Writes `buf`, returning the number of bytes written
    fn write(&mut self, _buf: &[u8]) -> Result<usize, FsError> {
        Err(FsError::Unsupported)
    }

    /// Returns the remaining entries of an open directory, sorted by name
    fn read_dir(&mut self) -> Result<Vec<DirEntry>, FsError> {
        Err(FsError::Unsupported)
    }

    /// Reads until EOF
    fn read_to_end(&mut self) -> Result<Vec<u8>, FsError> {
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = self.read(&mut buf)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    /// Writes the whole buffer
    fn write_all(&mut self, mut buf: &[u8]) -> Result<(), FsError> {
        while !buf.is_empty() {
            let n = self.write(buf)?;
            if n == 0 {
                return Err(FsError::Io);
            }
            buf = &buf[n..];
        }
        Ok(())
    }
}

impl fmt::Debug for dyn File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stat() {
            Ok(stat) => f.debug_tuple("File").field(&stat.name).finish(),
            Err(_) => f.write_str("File(<unknown>)"),
        }
    }
}
