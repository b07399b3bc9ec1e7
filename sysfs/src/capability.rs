//! Optional capabilities and the capability prober
//!
//! A wrapped filesystem exposes an optional operation by implementing the
//! matching single-method trait and overriding the `as_*` accessor on
//! [`crate::Fs`] to return `Some(self)`. [`Capabilities::probe`] inspects the
//! accessors once, at wrap time; nothing is invoked speculatively.

use crate::error::FsError;
use crate::file::{File, FileMode};
use crate::flags::OpenFlags;
use crate::fs::Fs;
use bitflags::bitflags;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Create a directory
pub trait Mkdir {
    /// Creates the directory `path` with permission bits `mode`
    fn mkdir(&self, path: &str, mode: FileMode) -> Result<(), FsError>;
}

/// Change permission bits
pub trait Chmod {
    /// Sets the permission bits of `path`
    fn chmod(&self, path: &str, mode: FileMode) -> Result<(), FsError>;
}

/// Rename or move an entry
pub trait Rename {
    /// Renames `from` to `to`, replacing `to` if the host allows it
    fn rename(&self, from: &str, to: &str) -> Result<(), FsError>;
}

/// Remove an empty directory
pub trait Rmdir {
    /// Removes the directory `path`
    fn rmdir(&self, path: &str) -> Result<(), FsError>;
}

/// Remove a non-directory entry
pub trait Unlink {
    /// Removes the file `path`
    fn unlink(&self, path: &str) -> Result<(), FsError>;
}

/// Change access and modification times
pub trait Utimes {
    /// Sets times on `path`, in nanoseconds since the Unix epoch
    fn utimes(&self, path: &str, atime_nanos: i64, mtime_nanos: i64) -> Result<(), FsError>;
}

/// Open with explicit intent flags
pub trait OpenFile {
    /// Opens `path`, interpreting `flags` and using `mode` on creation
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        mode: FileMode,
    ) -> Result<Box<dyn File>, FsError>;
}

bitflags! {
    /// The set of optional operations a wrapped filesystem exposes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// [`Mkdir`]
        const MKDIR = 1 << 0;
        /// [`Chmod`]
        const CHMOD = 1 << 1;
        /// [`Rename`]
        const RENAME = 1 << 2;
        /// [`Rmdir`]
        const RMDIR = 1 << 3;
        /// [`Unlink`]
        const UNLINK = 1 << 4;
        /// [`Utimes`]
        const UTIMES = 1 << 5;
        /// [`OpenFile`]
        const OPEN_FILE = 1 << 6;

        /// All six mutating operations
        const MUTATING = Self::MKDIR.bits()
            | Self::CHMOD.bits()
            | Self::RENAME.bits()
            | Self::RMDIR.bits()
            | Self::UNLINK.bits()
            | Self::UTIMES.bits();
    }
}

impl Capabilities {
    /// Inspects which optional operations `fs` exposes
    pub fn probe(fs: &dyn Fs) -> Self {
        let mut caps = Self::empty();
        caps.set(Self::MKDIR, fs.as_mkdir().is_some());
        caps.set(Self::CHMOD, fs.as_chmod().is_some());
        caps.set(Self::RENAME, fs.as_rename().is_some());
        caps.set(Self::RMDIR, fs.as_rmdir().is_some());
        caps.set(Self::UNLINK, fs.as_unlink().is_some());
        caps.set(Self::UTIMES, fs.as_utimes().is_some());
        caps.set(Self::OPEN_FILE, fs.as_open_file().is_some());

        debug!(
            "probed {}: capabilities [{}]",
            fs.root_name().unwrap_or(crate::UNNAMED_ROOT),
            caps
        );
        caps
    }

    /// Stable lowercase names of the contained capabilities
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names()
            .filter(|(_, flag)| flag.bits().count_ones() == 1)
            .map(|(name, _)| match name {
                "MKDIR" => "mkdir",
                "CHMOD" => "chmod",
                "RENAME" => "rename",
                "RMDIR" => "rmdir",
                "UNLINK" => "unlink",
                "UTIMES" => "utimes",
                _ => "open_file",
            })
            .collect()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}
