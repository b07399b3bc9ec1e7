//! Spy host
//!
//! Wraps another host and counts how often it was asked to open something,
//! so tests can prove the adapter failed before touching the host.

use std::sync::atomic::{AtomicUsize, Ordering};
use sysfs::{
    Chmod, File, FileMode, Fs, FsError, Mkdir, OpenFile, OpenFlags, Rename, Rmdir, Unlink, Utimes,
};

/// Transparent wrapper counting `open` and `open_file` calls
#[derive(Debug, Default)]
pub struct CountingFs<F> {
    inner: F,
    opens: AtomicUsize,
}

impl<F: Fs> CountingFs<F> {
    /// Wraps `inner`
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            opens: AtomicUsize::new(0),
        }
    }

    /// Number of opens that reached the wrapped host
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Returns the wrapped host
    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: Fs> Fs for CountingFs<F> {
    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.inner.open(path)
    }

    fn root_name(&self) -> Option<&str> {
        self.inner.root_name()
    }

    fn as_mkdir(&self) -> Option<&dyn Mkdir> {
        self.inner.as_mkdir()
    }

    fn as_chmod(&self) -> Option<&dyn Chmod> {
        self.inner.as_chmod()
    }

    fn as_rename(&self) -> Option<&dyn Rename> {
        self.inner.as_rename()
    }

    fn as_rmdir(&self) -> Option<&dyn Rmdir> {
        self.inner.as_rmdir()
    }

    fn as_unlink(&self) -> Option<&dyn Unlink> {
        self.inner.as_unlink()
    }

    fn as_utimes(&self) -> Option<&dyn Utimes> {
        self.inner.as_utimes()
    }

    fn as_open_file(&self) -> Option<&dyn OpenFile> {
        self.inner.as_open_file().map(|_| self as &dyn OpenFile)
    }
}

impl<F: Fs> OpenFile for CountingFs<F> {
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        mode: FileMode,
    ) -> Result<Box<dyn File>, FsError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.inner
            .as_open_file()
            .ok_or(FsError::Unsupported)?
            .open_file(path, flags, mode)
    }
}
