//! The minimal filesystem contract

use crate::capability::{Chmod, Mkdir, OpenFile, Rename, Rmdir, Unlink, Utimes};
use crate::error::FsError;
use crate::file::File;

/// The smallest filesystem a host can hand to the sandbox
///
/// Only [`Fs::open`] is required: open a relative path for reading. Paths
/// passed in by the adapter are always clean (see [`crate::path`]), with "."
/// naming the root.
///
/// A host that supports an optional operation implements the matching
/// capability trait and overrides its accessor:
///
/// ```
/// use sysfs::{File, FileMode, Fs, FsError, Mkdir};
///
/// struct Scratch;
///
/// impl Fs for Scratch {
///     fn open(&self, _path: &str) -> Result<Box<dyn File>, FsError> {
///         Err(FsError::NotFound)
///     }
///
///     fn as_mkdir(&self) -> Option<&dyn Mkdir> {
///         Some(self)
///     }
/// }
///
/// impl Mkdir for Scratch {
///     fn mkdir(&self, _path: &str, _mode: FileMode) -> Result<(), FsError> {
///         Ok(())
///     }
/// }
///
/// let adapter = sysfs::adapt(Scratch);
/// assert_eq!(adapter.mkdir("new", FileMode::new(0o755)), Ok(()));
/// assert_eq!(adapter.rmdir("new"), Err(FsError::Unsupported));
/// ```
pub trait Fs: Send + Sync {
    /// Opens `path` for reading
    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError>;

    /// Identity of the root, for diagnostics
    fn root_name(&self) -> Option<&str> {
        None
    }

    /// Directory creation, if supported
    fn as_mkdir(&self) -> Option<&dyn Mkdir> {
        None
    }

    /// Permission changes, if supported
    fn as_chmod(&self) -> Option<&dyn Chmod> {
        None
    }

    /// Rename, if supported
    fn as_rename(&self) -> Option<&dyn Rename> {
        None
    }

    /// Directory removal, if supported
    fn as_rmdir(&self) -> Option<&dyn Rmdir> {
        None
    }

    /// File removal, if supported
    fn as_unlink(&self) -> Option<&dyn Unlink> {
        None
    }

    /// Timestamp changes, if supported
    fn as_utimes(&self) -> Option<&dyn Utimes> {
        None
    }

    /// Flagged open, if supported
    fn as_open_file(&self) -> Option<&dyn OpenFile> {
        None
    }
}
