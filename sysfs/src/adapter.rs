//! The adapter
//!
//! Upgrades any [`Fs`] to the full set of operations the sandbox's system-call
//! layer expects. Each call validates, consults the probed capability set,
//! then delegates or fails with [`FsError::Unsupported`].

use crate::capability::Capabilities;
use crate::error::FsError;
use crate::file::{File, FileMode};
use crate::flags::OpenFlags;
use crate::fs::Fs;
use crate::path::clean_path;
use crate::UNNAMED_ROOT;
use log::trace;
use std::fmt;
use std::sync::Arc;

/// A richer filesystem view over a wrapped [`Fs`]
///
/// Immutable after construction. Cloning shares the wrapped filesystem.
#[derive(Clone)]
pub struct Adapter {
    fs: Arc<dyn Fs>,
    caps: Capabilities,
}

impl Adapter {
    /// Wraps `fs`, probing its optional capabilities once
    pub fn new<F: Fs + 'static>(fs: F) -> Self {
        Self::from_arc(Arc::new(fs))
    }

    /// Wraps a filesystem the caller keeps shared ownership of
    pub fn from_arc(fs: Arc<dyn Fs>) -> Self {
        let caps = Capabilities::probe(fs.as_ref());
        Self { fs, caps }
    }

    /// Returns the capability set probed at wrap time
    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Returns the wrapped filesystem
    pub fn inner(&self) -> &Arc<dyn Fs> {
        &self.fs
    }

    /// Diagnostic name: the wrapped root's identity, or [`UNNAMED_ROOT`]
    pub fn name(&self) -> &str {
        self.fs.root_name().unwrap_or(UNNAMED_ROOT)
    }

    fn require(&self, cap: Capabilities, op: &str) -> Result<(), FsError> {
        if self.caps.contains(cap) {
            trace!("{}: delegating {op}", self.name());
            Ok(())
        } else {
            trace!("{}: {op} not supported", self.name());
            Err(FsError::Unsupported)
        }
    }

    /// Opens `path` with the given intent
    ///
    /// Hosts exposing [`crate::OpenFile`] receive `flags` and `mode`
    /// unmodified. Otherwise the minimal open is used and its handle is
    /// returned as-is, even when it is writable.
    pub fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        mode: FileMode,
    ) -> Result<Box<dyn File>, FsError> {
        let path = clean_path(path)?;

        if self.caps.contains(Capabilities::OPEN_FILE) {
            if let Some(open_file) = self.fs.as_open_file() {
                trace!("{}: delegating open_file {path} {flags:?}", self.name());
                return open_file.open_file(&path, flags, mode);
            }
        }

        trace!("{}: open {path} {flags:?} via minimal open", self.name());
        let file = self.fs.open(&path)?;
        if flags.contains(OpenFlags::DIRECTORY) && !file.stat()?.is_dir() {
            return Err(FsError::NotFound);
        }
        Ok(file)
    }

    /// Creates a directory
    pub fn mkdir(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        self.require(Capabilities::MKDIR, "mkdir")?;
        let path = clean_path(path)?;
        let mkdir = self.fs.as_mkdir().ok_or(FsError::Unsupported)?;
        mkdir.mkdir(&path, mode)
    }

    /// Changes permission bits
    pub fn chmod(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        self.require(Capabilities::CHMOD, "chmod")?;
        let path = clean_path(path)?;
        let chmod = self.fs.as_chmod().ok_or(FsError::Unsupported)?;
        chmod.chmod(&path, mode)
    }

    /// Renames `from` to `to`
    pub fn rename(&self, from: &str, to: &str) -> Result<(), FsError> {
        self.require(Capabilities::RENAME, "rename")?;
        let from = clean_path(from)?;
        let to = clean_path(to)?;
        let rename = self.fs.as_rename().ok_or(FsError::Unsupported)?;
        rename.rename(&from, &to)
    }

    /// Removes an empty directory
    pub fn rmdir(&self, path: &str) -> Result<(), FsError> {
        self.require(Capabilities::RMDIR, "rmdir")?;
        let path = clean_path(path)?;
        let rmdir = self.fs.as_rmdir().ok_or(FsError::Unsupported)?;
        rmdir.rmdir(&path)
    }

    /// Removes a file
    pub fn unlink(&self, path: &str) -> Result<(), FsError> {
        self.require(Capabilities::UNLINK, "unlink")?;
        let path = clean_path(path)?;
        let unlink = self.fs.as_unlink().ok_or(FsError::Unsupported)?;
        unlink.unlink(&path)
    }

    /// Sets access and modification times, in nanoseconds
    pub fn utimes(&self, path: &str, atime_nanos: i64, mtime_nanos: i64) -> Result<(), FsError> {
        self.require(Capabilities::UTIMES, "utimes")?;
        let path = clean_path(path)?;
        let utimes = self.fs.as_utimes().ok_or(FsError::Unsupported)?;
        utimes.utimes(&path, atime_nanos, mtime_nanos)
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("name", &self.name())
            .field("capabilities", &self.caps)
            .finish()
    }
}
