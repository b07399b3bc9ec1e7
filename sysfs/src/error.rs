//! Error taxonomy
//!
//! Every failure that crosses the adapter boundary is one of the variants
//! below. Variants carry no payload, so nothing implementation-specific can
//! leak to the sandbox's system-call layer.

use std::io;
use thiserror::Error;

/// Normalized filesystem errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsError {
    /// The wrapped filesystem lacks the requested optional capability
    #[error("Operation not supported")]
    Unsupported,

    /// Path is empty, absolute, or escapes the root
    #[error("Invalid argument")]
    InvalidArgument,

    /// Path does not exist, or a component is not a directory
    #[error("Not found")]
    NotFound,

    /// A plain file was expected but a directory was found
    #[error("Is a directory")]
    IsDirectory,

    /// Target already exists, or a directory to remove is not empty
    #[error("Already exists")]
    AlreadyExists,

    /// Host refused access
    #[error("Permission denied")]
    PermissionDenied,

    /// Any other host I/O failure
    #[error("I/O error")]
    Io,
}

impl FsError {
    /// Returns the WASI preview1 errno value for this error
    pub fn errno(self) -> u16 {
        match self {
            FsError::Unsupported => 52,
            FsError::InvalidArgument => 28,
            FsError::NotFound => 44,
            FsError::IsDirectory => 31,
            FsError::AlreadyExists => 20,
            FsError::PermissionDenied => 2,
            FsError::Io => 29,
        }
    }
}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => FsError::NotFound,
            io::ErrorKind::IsADirectory => FsError::IsDirectory,
            // POSIX allows EEXIST for rmdir of a non-empty directory
            io::ErrorKind::AlreadyExists | io::ErrorKind::DirectoryNotEmpty => {
                FsError::AlreadyExists
            }
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
            io::ErrorKind::InvalidInput => FsError::InvalidArgument,
            io::ErrorKind::Unsupported => FsError::Unsupported,
            _ => FsError::Io,
        }
    }
}
