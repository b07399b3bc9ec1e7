//! In-memory host
//!
//! `MapFs::new()` exposes only the minimal contract. `MapFs::writable()`
//! additionally exposes every optional capability, so the same host type can
//! stand in for both ends of the capability spectrum.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use sysfs::path::ROOT;
use sysfs::{
    clean_path, Chmod, DirEntry, File, FileMode, FileType, Fs, FsError, Mkdir, OpenFile,
    OpenFlags, Rename, Rmdir, Stat, Unlink, Utimes,
};

use crate::dir_fs::base_name;

/// A single node in a [`MapFs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFile {
    /// File contents (empty for directories)
    pub data: Vec<u8>,
    /// Permission bits
    pub mode: FileMode,
    /// Modification time in nanoseconds
    pub mtime_nanos: i64,
    /// True for explicit directories
    pub is_dir: bool,
}

impl MapFile {
    /// A regular file with read-only permissions
    pub fn file(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            mode: FileMode::new(0o444),
            mtime_nanos: 0,
            is_dir: false,
        }
    }

    /// An explicit directory
    pub fn dir() -> Self {
        Self {
            data: Vec::new(),
            mode: FileMode::new(0o555),
            mtime_nanos: 0,
            is_dir: true,
        }
    }
}

type Tree = BTreeMap<String, MapFile>;

/// An in-memory filesystem keyed by clean path
///
/// Parent directories of every key exist implicitly.
#[derive(Debug, Clone, Default)]
pub struct MapFs {
    tree: Arc<RwLock<Tree>>,
    writable: bool,
    name: Option<String>,
}

impl MapFs {
    /// Creates an empty minimal filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty filesystem exposing every optional capability
    pub fn writable() -> Self {
        Self {
            writable: true,
            ..Self::default()
        }
    }

    /// Sets the identity reported by `root_name`
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Inserts a node, replacing any existing one
    pub fn insert(&self, path: &str, file: MapFile) -> Result<(), FsError> {
        let path = strict_non_root(path)?;
        write_tree(&self.tree)?.insert(path.to_string(), file);
        Ok(())
    }

    /// Builder form of [`MapFs::insert`]
    pub fn with(self, path: &str, file: MapFile) -> Result<Self, FsError> {
        self.insert(path, file)?;
        Ok(self)
    }

    /// Returns a copy of the node at `path`, if explicitly present
    pub fn get(&self, path: &str) -> Option<MapFile> {
        self.tree.read().ok()?.get(path).cloned()
    }

    /// Returns all explicit paths in order
    pub fn paths(&self) -> Vec<String> {
        self.tree
            .read()
            .map(|tree| tree.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn entry_type(tree: &Tree, path: &str) -> Option<FileType> {
        if path == ROOT {
            return Some(FileType::Directory);
        }
        if let Some(file) = tree.get(path) {
            return Some(if file.is_dir {
                FileType::Directory
            } else {
                FileType::File
            });
        }
        let prefix = format!("{path}/");
        tree.keys()
            .any(|key| key.starts_with(&prefix))
            .then_some(FileType::Directory)
    }

    fn children(tree: &Tree, path: &str) -> Vec<DirEntry> {
        let prefix = if path == ROOT {
            String::new()
        } else {
            format!("{path}/")
        };

        let mut children: BTreeMap<&str, FileType> = BTreeMap::new();
        for (key, file) in tree.range(prefix.clone()..) {
            let Some(rest) = key.strip_prefix(&prefix) else {
                break;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    children.insert(child, FileType::Directory);
                }
                None if file.is_dir => {
                    children.insert(rest, FileType::Directory);
                }
                None => {
                    children.entry(rest).or_insert(FileType::File);
                }
            }
        }

        children
            .into_iter()
            .map(|(name, file_type)| DirEntry::new(name, file_type))
            .collect()
    }

    fn handle(&self, tree: &Tree, path: &str, flags: OpenFlags) -> Result<Box<dyn File>, FsError> {
        let file_type = Self::entry_type(tree, path).ok_or(FsError::NotFound)?;
        let entries = (file_type == FileType::Directory).then(|| Self::children(tree, path));
        Ok(Box::new(MapHandle {
            tree: Arc::clone(&self.tree),
            path: path.to_string(),
            entries,
            pos: 0,
            writable: self.writable && flags.wants_write(),
            append: flags.contains(OpenFlags::APPEND),
        }))
    }

    fn parent_is_dir(tree: &Tree, path: &str) -> bool {
        let parent = path.rsplit_once('/').map_or(ROOT, |(parent, _)| parent);
        Self::entry_type(tree, parent) == Some(FileType::Directory)
    }
}

impl Fs for MapFs {
    fn open(&self, path: &str) -> Result<Box<dyn File>, FsError> {
        let path = strict(path)?;
        let tree = read_tree(&self.tree)?;
        self.handle(&tree, path, OpenFlags::READ_ONLY)
    }

    fn root_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn as_mkdir(&self) -> Option<&dyn Mkdir> {
        self.writable.then_some(self as &dyn Mkdir)
    }

    fn as_chmod(&self) -> Option<&dyn Chmod> {
        self.writable.then_some(self as &dyn Chmod)
    }

    fn as_rename(&self) -> Option<&dyn Rename> {
        self.writable.then_some(self as &dyn Rename)
    }

    fn as_rmdir(&self) -> Option<&dyn Rmdir> {
        self.writable.then_some(self as &dyn Rmdir)
    }

    fn as_unlink(&self) -> Option<&dyn Unlink> {
        self.writable.then_some(self as &dyn Unlink)
    }

    fn as_utimes(&self) -> Option<&dyn Utimes> {
        self.writable.then_some(self as &dyn Utimes)
    }

    fn as_open_file(&self) -> Option<&dyn OpenFile> {
        self.writable.then_some(self as &dyn OpenFile)
    }
}

impl Mkdir for MapFs {
    fn mkdir(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        let path = strict(path)?;
        let mut tree = write_tree(&self.tree)?;
        if Self::entry_type(&tree, path).is_some() {
            return Err(FsError::AlreadyExists);
        }
        if !Self::parent_is_dir(&tree, path) {
            return Err(FsError::NotFound);
        }
        tree.insert(
            path.to_string(),
            MapFile {
                mode,
                ..MapFile::dir()
            },
        );
        Ok(())
    }
}

impl Chmod for MapFs {
    fn chmod(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        let path = strict_non_root(path)?;
        let mut tree = write_tree(&self.tree)?;
        match Self::entry_type(&tree, path) {
            None => Err(FsError::NotFound),
            Some(_) => {
                tree.entry(path.to_string()).or_insert_with(MapFile::dir).mode = mode;
                Ok(())
            }
        }
    }
}

impl Rename for MapFs {
    fn rename(&self, from: &str, to: &str) -> Result<(), FsError> {
        let (from, to) = (strict(from)?, strict(to)?);
        let mut tree = write_tree(&self.tree)?;
        if from == to {
            return Self::entry_type(&tree, from).map(|_| ()).ok_or(FsError::NotFound);
        }

        let from_type = Self::entry_type(&tree, from).ok_or(FsError::NotFound)?;
        if from == ROOT || to == ROOT || to.starts_with(&format!("{from}/")) {
            return Err(FsError::InvalidArgument);
        }
        if !Self::parent_is_dir(&tree, to) {
            return Err(FsError::NotFound);
        }
        match Self::entry_type(&tree, to) {
            Some(FileType::Directory) if from_type != FileType::Directory => {
                return Err(FsError::IsDirectory)
            }
            Some(FileType::Directory) if !Self::children(&tree, to).is_empty() => {
                return Err(FsError::AlreadyExists)
            }
            Some(_) if from_type == FileType::Directory => return Err(FsError::NotFound),
            _ => {}
        }

        tree.remove(to);
        let prefix = format!("{from}/");
        let moved: Vec<String> = tree
            .keys()
            .filter(|key| *key == from || key.starts_with(&prefix))
            .cloned()
            .collect();
        for key in moved {
            if let Some(file) = tree.remove(&key) {
                let new_key = format!("{to}{}", &key[from.len()..]);
                tree.insert(new_key, file);
            }
        }
        if from_type == FileType::Directory && !tree.contains_key(to) {
            tree.insert(to.to_string(), MapFile::dir());
        }
        Ok(())
    }
}

impl Rmdir for MapFs {
    fn rmdir(&self, path: &str) -> Result<(), FsError> {
        let path = strict(path)?;
        let mut tree = write_tree(&self.tree)?;
        match Self::entry_type(&tree, path) {
            None | Some(FileType::File) => Err(FsError::NotFound),
            Some(_) if path == ROOT => Err(FsError::InvalidArgument),
            Some(_) if !Self::children(&tree, path).is_empty() => Err(FsError::AlreadyExists),
            Some(_) => {
                tree.remove(path);
                Ok(())
            }
        }
    }
}

impl Unlink for MapFs {
    fn unlink(&self, path: &str) -> Result<(), FsError> {
        let path = strict(path)?;
        let mut tree = write_tree(&self.tree)?;
        match Self::entry_type(&tree, path) {
            None => Err(FsError::NotFound),
            Some(FileType::Directory) => Err(FsError::IsDirectory),
            Some(_) => {
                tree.remove(path);
                Ok(())
            }
        }
    }
}

impl Utimes for MapFs {
    fn utimes(&self, path: &str, _atime_nanos: i64, mtime_nanos: i64) -> Result<(), FsError> {
        let path = strict_non_root(path)?;
        let mut tree = write_tree(&self.tree)?;
        if Self::entry_type(&tree, path).is_none() {
            return Err(FsError::NotFound);
        }
        tree.entry(path.to_string())
            .or_insert_with(MapFile::dir)
            .mtime_nanos = mtime_nanos;
        Ok(())
    }
}

impl OpenFile for MapFs {
    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        mode: FileMode,
    ) -> Result<Box<dyn File>, FsError> {
        let path = strict(path)?;
        let mut tree = write_tree(&self.tree)?;

        match Self::entry_type(&tree, path) {
            Some(_) if flags.contains(OpenFlags::CREATE | OpenFlags::EXCLUSIVE) => {
                return Err(FsError::AlreadyExists)
            }
            Some(FileType::Directory) if flags.wants_write() => return Err(FsError::IsDirectory),
            Some(FileType::Directory) => {}
            Some(_) if flags.contains(OpenFlags::DIRECTORY) => return Err(FsError::NotFound),
            Some(_) => {
                if flags.contains(OpenFlags::TRUNCATE) {
                    if let Some(file) = tree.get_mut(path) {
                        file.data.clear();
                    }
                }
            }
            None if flags.contains(OpenFlags::CREATE) => {
                if !Self::parent_is_dir(&tree, path) {
                    return Err(FsError::NotFound);
                }
                tree.insert(
                    path.to_string(),
                    MapFile {
                        mode,
                        ..MapFile::file(Vec::new())
                    },
                );
            }
            None => return Err(FsError::NotFound),
        }

        self.handle(&tree, path, flags)
    }
}

/// Open handle into a [`MapFs`]
///
/// File contents are read from the shared tree, so writes through one handle
/// are visible to the next open.
struct MapHandle {
    tree: Arc<RwLock<Tree>>,
    path: String,
    entries: Option<Vec<DirEntry>>,
    pos: usize,
    writable: bool,
    append: bool,
}

impl File for MapHandle {
    fn stat(&self) -> Result<Stat, FsError> {
        let tree = read_tree(&self.tree)?;
        let node = tree.get(&self.path);
        let file_type = MapFs::entry_type(&tree, &self.path).ok_or(FsError::NotFound)?;
        let default_mode = if file_type == FileType::Directory {
            MapFile::dir().mode
        } else {
            MapFile::file(Vec::new()).mode
        };

        Ok(Stat {
            name: base_name(&self.path).to_string(),
            file_type,
            mode: node.map_or(default_mode, |file| file.mode),
            size: node.map_or(0, |file| file.data.len() as u64),
            mtime_nanos: node.map_or(0, |file| file.mtime_nanos),
        })
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        if self.entries.is_some() {
            return Err(FsError::IsDirectory);
        }
        let tree = read_tree(&self.tree)?;
        let data = &tree.get(&self.path).ok_or(FsError::NotFound)?.data;
        let start = self.pos.min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.pos = start + n;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, FsError> {
        if !self.writable {
            return Err(FsError::Unsupported);
        }
        let mut tree = write_tree(&self.tree)?;
        let data = &mut tree.get_mut(&self.path).ok_or(FsError::NotFound)?.data;
        if self.append {
            self.pos = data.len();
        }
        let end = self.pos + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn read_dir(&mut self) -> Result<Vec<DirEntry>, FsError> {
        match self.entries.as_mut() {
            Some(entries) => Ok(std::mem::take(entries)),
            None => Err(FsError::NotFound),
        }
    }
}

/// Accepts only paths that are already clean, like a strict host would
fn strict(path: &str) -> Result<&str, FsError> {
    let clean = clean_path(path)?;
    if clean.as_str() == path {
        Ok(path)
    } else {
        Err(FsError::InvalidArgument)
    }
}

// The root has no node of its own, so it cannot carry mode or times.
fn strict_non_root(path: &str) -> Result<&str, FsError> {
    match strict(path)? {
        ROOT => Err(FsError::InvalidArgument),
        path => Ok(path),
    }
}

fn read_tree(tree: &RwLock<Tree>) -> Result<RwLockReadGuard<'_, Tree>, FsError> {
    tree.read().map_err(|_| FsError::Io)
}

fn write_tree(tree: &RwLock<Tree>) -> Result<RwLockWriteGuard<'_, Tree>, FsError> {
    tree.write().map_err(|_| FsError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MapFs {
        MapFs::writable()
            .with("animals.txt", MapFile::file("bear\n"))
            .unwrap()
            .with("sub/test.txt", MapFile::file("greet sub dir\n"))
            .unwrap()
            .with("emptydir", MapFile::dir())
            .unwrap()
    }

    #[test]
    fn test_minimal_exposes_nothing() {
        let fs = MapFs::new();
        assert!(fs.as_mkdir().is_none());
        assert!(fs.as_open_file().is_none());
        assert!(MapFs::writable().as_utimes().is_some());
    }

    #[test]
    fn test_synthesized_directories() {
        let fs = sample();
        let mut root = fs.open(".").unwrap();
        assert_eq!(
            root.read_dir().unwrap(),
            vec![
                DirEntry::new("animals.txt", FileType::File),
                DirEntry::new("emptydir", FileType::Directory),
                DirEntry::new("sub", FileType::Directory),
            ]
        );
        let sub = fs.open("sub").unwrap();
        assert!(sub.stat().unwrap().is_dir());
        assert_eq!(fs.open("nope").unwrap_err(), FsError::NotFound);
    }

    #[test]
    fn test_read_directory_fails() {
        let fs = sample();
        let mut sub = fs.open("sub").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(sub.read(&mut buf), Err(FsError::IsDirectory));
    }

    #[test]
    fn test_mkdir_and_rmdir() {
        let fs = sample();
        fs.mkdir("sub/new", FileMode::new(0o700)).unwrap();
        assert_eq!(fs.mkdir("sub/new", FileMode::new(0o700)), Err(FsError::AlreadyExists));
        assert_eq!(fs.mkdir("none/new", FileMode::new(0o700)), Err(FsError::NotFound));
        assert_eq!(fs.rmdir("sub"), Err(FsError::AlreadyExists));
        fs.rmdir("sub/new").unwrap();
        assert_eq!(fs.rmdir("animals.txt"), Err(FsError::NotFound));
    }

    #[test]
    fn test_rename_directory_moves_children() {
        let fs = sample();
        fs.rename("sub", "moved").unwrap();
        assert_eq!(fs.open("sub/test.txt").unwrap_err(), FsError::NotFound);
        let mut file = fs.open("moved/test.txt").unwrap();
        assert_eq!(file.read_to_end().unwrap(), b"greet sub dir\n");
    }

    #[test]
    fn test_rename_file_over_directory() {
        let fs = sample();
        assert_eq!(fs.rename("animals.txt", "emptydir"), Err(FsError::IsDirectory));
    }

    #[test]
    fn test_unlink() {
        let fs = sample();
        assert_eq!(fs.unlink("sub"), Err(FsError::IsDirectory));
        fs.unlink("animals.txt").unwrap();
        assert_eq!(fs.unlink("animals.txt"), Err(FsError::NotFound));
    }

    #[test]
    fn test_chmod_and_utimes() {
        let fs = sample();
        fs.chmod("animals.txt", FileMode::new(0o600)).unwrap();
        fs.utimes("animals.txt", 1, 2).unwrap();
        let stat = fs.open("animals.txt").unwrap().stat().unwrap();
        assert_eq!(stat.mode, FileMode::new(0o600));
        assert_eq!(stat.mtime_nanos, 2);
    }

    #[test]
    fn test_open_file_create_write_read_back() {
        let fs = sample();
        let flags = OpenFlags::READ_WRITE | OpenFlags::CREATE | OpenFlags::EXCLUSIVE;
        let mut file = fs.open_file("sub/new.txt", flags, FileMode::new(0o600)).unwrap();
        file.write_all(b"hello").unwrap();
        drop(file);

        assert_eq!(
            fs.open_file("sub/new.txt", flags, FileMode::new(0o600)).unwrap_err(),
            FsError::AlreadyExists
        );
        let mut file = fs.open("sub/new.txt").unwrap();
        assert_eq!(file.read_to_end().unwrap(), b"hello");
        assert_eq!(file.write(b"x"), Err(FsError::Unsupported));
    }

    #[test]
    fn test_open_file_append_and_truncate() {
        let fs = sample();
        let mut file = fs
            .open_file(
                "animals.txt",
                OpenFlags::WRITE_ONLY | OpenFlags::APPEND,
                FileMode::default(),
            )
            .unwrap();
        file.write_all(b"cat\n").unwrap();
        assert_eq!(fs.get("animals.txt").unwrap().data, b"bear\ncat\n");

        fs.open_file(
            "animals.txt",
            OpenFlags::WRITE_ONLY | OpenFlags::TRUNCATE,
            FileMode::default(),
        )
        .unwrap();
        assert!(fs.get("animals.txt").unwrap().data.is_empty());
    }

    #[test]
    fn test_strict_paths() {
        let fs = sample();
        assert_eq!(fs.open("./animals.txt").unwrap_err(), FsError::InvalidArgument);
        assert_eq!(fs.open("../animals.txt").unwrap_err(), FsError::InvalidArgument);
    }
}
