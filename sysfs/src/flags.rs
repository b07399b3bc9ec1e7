//! Open flags
//!
//! Flags describe the intent of an open. They are interpreted by hosts that
//! expose [`crate::OpenFile`]; for minimal hosts the adapter only looks at
//! [`OpenFlags::DIRECTORY`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Intent flags for [`crate::Adapter::open_file`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct OpenFlags: u32 {
        /// Open for writing only
        const WRITE_ONLY = 1 << 0;
        /// Open for reading and writing
        const READ_WRITE = 1 << 1;
        /// Writes append to the end
        const APPEND = 1 << 2;
        /// Create the file if missing
        const CREATE = 1 << 3;
        /// With CREATE, fail if the file exists
        const EXCLUSIVE = 1 << 4;
        /// Truncate to zero length
        const TRUNCATE = 1 << 5;
        /// Fail unless the path is a directory
        const DIRECTORY = 1 << 6;
        /// Synchronous writes
        const SYNC = 1 << 7;
    }
}

impl OpenFlags {
    /// Read-only access (no bits set)
    pub const READ_ONLY: Self = Self::empty();

    /// Returns true if the flags request no write access and no creation
    pub fn is_read_only(self) -> bool {
        !self.intersects(
            Self::WRITE_ONLY | Self::READ_WRITE | Self::APPEND | Self::CREATE | Self::TRUNCATE,
        )
    }

    /// Returns true if the handle is expected to be readable
    pub fn wants_read(self) -> bool {
        !self.contains(Self::WRITE_ONLY) || self.contains(Self::READ_WRITE)
    }

    /// Returns true if the handle is expected to be writable
    pub fn wants_write(self) -> bool {
        self.intersects(Self::WRITE_ONLY | Self::READ_WRITE | Self::APPEND)
    }
}

impl Default for OpenFlags {
    fn default() -> Self {
        Self::READ_ONLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_is_empty() {
        assert!(OpenFlags::READ_ONLY.is_empty());
        assert!(OpenFlags::READ_ONLY.is_read_only());
        assert!(OpenFlags::READ_ONLY.wants_read());
        assert!(!OpenFlags::READ_ONLY.wants_write());
        assert_eq!(OpenFlags::default(), OpenFlags::READ_ONLY);
    }

    #[test]
    fn test_access_modes() {
        assert!(OpenFlags::READ_WRITE.wants_read());
        assert!(OpenFlags::READ_WRITE.wants_write());
        assert!(!OpenFlags::WRITE_ONLY.wants_read());
        assert!(OpenFlags::WRITE_ONLY.wants_write());
        assert!(!(OpenFlags::CREATE | OpenFlags::EXCLUSIVE).is_read_only());
    }

    #[test]
    fn test_directory_flag_keeps_read_only() {
        assert!(OpenFlags::DIRECTORY.is_read_only());
    }
}
