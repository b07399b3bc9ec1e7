//! Path validation
//!
//! Every path that reaches a wrapped filesystem goes through [`clean_path`]
//! first. The wrapped filesystem therefore only ever sees relative, lexically
//! clean paths that stay under its root, with "." naming the root itself.

use crate::error::FsError;
use log::debug;
use std::fmt;
use std::ops::Deref;

/// Name of the root directory after cleaning
pub const ROOT: &str = ".";

/// A path proven to be relative, clean and inside the root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CleanPath(String);

impl CleanPath {
    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this names the root
    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    /// Returns the final component ("." for the root)
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(ROOT)
    }

    /// Joins a single entry name onto this path
    pub fn join(&self, name: &str) -> Result<CleanPath, FsError> {
        if !is_valid_name(name) {
            return Err(FsError::InvalidArgument);
        }
        if self.is_root() {
            Ok(CleanPath(name.to_string()))
        } else {
            Ok(CleanPath(format!("{}/{}", self.0, name)))
        }
    }
}

impl Deref for CleanPath {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CleanPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CleanPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates and lexically cleans a guest path
///
/// Rejects empty paths, absolute paths, NUL bytes and any path whose `..`
/// segments would climb above the root. Empty and "." segments are dropped.
///
/// # Examples
///
/// ```
/// use sysfs::path::clean_path;
///
/// assert_eq!(clean_path("sub/./test.txt").unwrap().as_str(), "sub/test.txt");
/// assert_eq!(clean_path("sub/..").unwrap().as_str(), ".");
/// assert!(clean_path("../foo").is_err());
/// assert!(clean_path("/etc/passwd").is_err());
/// ```
pub fn clean_path(path: &str) -> Result<CleanPath, FsError> {
    if path.is_empty() || path.starts_with('/') || path.contains('\0') {
        debug!("rejecting path {path:?}: empty, absolute or contains NUL");
        return Err(FsError::InvalidArgument);
    }

    let mut components: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if components.pop().is_none() {
                    debug!("rejecting path {path:?}: escapes the root");
                    return Err(FsError::InvalidArgument);
                }
            }
            name => components.push(name),
        }
    }

    if components.is_empty() {
        return Ok(CleanPath(ROOT.to_string()));
    }
    Ok(CleanPath(components.join("/")))
}

/// Returns true if `name` is usable as a single directory entry name
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/') && !name.contains('\0')
}
