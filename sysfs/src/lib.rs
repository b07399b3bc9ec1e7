//! # Sysfs Adapter
//!
//! This crate upgrades an arbitrary host filesystem into the filesystem
//! surface a sandbox's system-call layer expects.
//!
//! ## Philosophy
//!
//! - **Minimal in, uniform out**: a host only has to implement [`Fs::open`]
//! - **Capabilities, not base classes**: each optional operation is its own
//!   single-method trait, probed once at wrap time
//! - **Paths never escape**: every path is cleaned and checked before any host
//!   sees it
//! - **One error taxonomy**: callers dispatch on [`FsError`] alone
//! - **Tolerant pass-through**: handles come back exactly as the host made them
//!
//! ## Example
//!
//! ```
//! use sysfs::{File, FileMode, Fs, FsError, OpenFlags};
//!
//! struct Empty;
//!
//! impl Fs for Empty {
//!     fn open(&self, _path: &str) -> Result<Box<dyn File>, FsError> {
//!         Err(FsError::NotFound)
//!     }
//! }
//!
//! let adapter = sysfs::adapt(Empty);
//! assert_eq!(adapter.mkdir("dir", FileMode::new(0o755)), Err(FsError::Unsupported));
//! assert_eq!(
//!     adapter.open_file("../etc", OpenFlags::READ_ONLY, FileMode::default()).unwrap_err(),
//!     FsError::InvalidArgument
//! );
//! ```

pub mod adapter;
pub mod capability;
pub mod error;
pub mod file;
pub mod flags;
pub mod fs;
pub mod path;
mod reverse;

pub use adapter::Adapter;
pub use capability::{Capabilities, Chmod, Mkdir, OpenFile, Rename, Rmdir, Unlink, Utimes};
pub use error::FsError;
pub use file::{DirEntry, File, FileMode, FileType, Stat};
pub use flags::OpenFlags;
pub use fs::Fs;
pub use path::{clean_path, CleanPath};

/// Name reported by an adapter whose host has no identity of its own
pub const UNNAMED_ROOT: &str = "<unnamed>";

/// Wraps `fs` in an [`Adapter`]
pub fn adapt<F: Fs + 'static>(fs: F) -> Adapter {
    Adapter::new(fs)
}
