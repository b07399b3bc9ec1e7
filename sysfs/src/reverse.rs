//! Reverse adapter
//!
//! Re-exposes an [`Adapter`] through the minimal [`Fs`] contract so suites
//! written against that contract can exercise the adapter end to end. Only
//! `open` and the identity are forwarded; optional capabilities are not.

use crate::adapter::Adapter;
use crate::error::FsError;
use crate::file::{File, FileMode};
use crate::flags::OpenFlags;
use crate::fs::Fs;

impl Fs for Adapter {
    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
        self.open_file(path, OpenFlags::READ_ONLY, FileMode::default())
    }

    fn root_name(&self) -> Option<&str> {
        Some(self.name())
    }
}

impl Adapter {
    /// Returns this adapter as a minimal filesystem
    pub fn as_fs(&self) -> &dyn Fs {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Capabilities, Rmdir};

    struct Host;

    impl Fs for Host {
        fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
            assert_ne!(path, "../x", "escaping path reached the host");
            Err(FsError::NotFound)
        }

        fn root_name(&self) -> Option<&str> {
            Some("host")
        }

        fn as_rmdir(&self) -> Option<&dyn Rmdir> {
            Some(self)
        }
    }

    impl Rmdir for Host {
        fn rmdir(&self, _path: &str) -> Result<(), FsError> {
            Ok(())
        }
    }

    #[test]
    fn test_view_keeps_identity() {
        let adapter = Adapter::new(Host);
        assert_eq!(adapter.as_fs().root_name(), Some("host"));
    }

    #[test]
    fn test_view_validates_paths() {
        let adapter = Adapter::new(Host);
        let view = adapter.as_fs();
        assert_eq!(view.open("../x").unwrap_err(), FsError::InvalidArgument);
        assert_eq!(view.open("x").unwrap_err(), FsError::NotFound);
    }

    #[test]
    fn test_view_hides_capabilities() {
        let adapter = Adapter::new(Host);
        assert_eq!(adapter.capabilities(), Capabilities::RMDIR);

        let rewrapped = Adapter::new(adapter.clone());
        assert!(rewrapped.capabilities().is_empty());
        assert_eq!(rewrapped.rmdir("d"), Err(FsError::Unsupported));
        assert_eq!(rewrapped.name(), "host");
    }
}
