//! In-memory [`FileSystem`] fake, pre-populated with paths and metadata.

#![allow(missing_docs)]

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::errors::{FqError, Result};
use crate::filesystem::FileSystem;

/// One file held by [`MemoryFileSystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    pub path: PathBuf,
    pub len: u64,
    pub modified: SystemTime,
    pub accessed: SystemTime,
    pub created: SystemTime,
}

impl MemoryFile {
    /// A file of `len` bytes with every timestamp at the Unix epoch.
    pub fn new(path: impl Into<PathBuf>, len: u64) -> Self {
        Self {
            path: path.into(),
            len,
            modified: SystemTime::UNIX_EPOCH,
            accessed: SystemTime::UNIX_EPOCH,
            created: SystemTime::UNIX_EPOCH,
        }
    }

    #[must_use]
    pub fn modified(mut self, at: SystemTime) -> Self {
        self.modified = at;
        self
    }

    #[must_use]
    pub fn accessed(mut self, at: SystemTime) -> Self {
        self.accessed = at;
        self
    }

    #[must_use]
    pub fn created(mut self, at: SystemTime) -> Self {
        self.created = at;
        self
    }
}

/// Filesystem fake that enumerates children in insertion order.
///
/// Adding a file registers every ancestor directory, so `/a/b/c.txt` makes
/// `/`, `/a` and `/a/b` exist. Directories marked with [`deny`](Self::deny)
/// fail enumeration and metadata reads with a permission error.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Vec<MemoryFile>,
    directories: Vec<PathBuf>,
    denied: Vec<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory (and its ancestors) even when it holds no files.
    pub fn add_directory(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let path = path.as_ref();
        let mut chain: Vec<&Path> = path.ancestors().collect();
        // Outermost first so enumeration order follows the order paths were added.
        chain.reverse();
        for dir in chain {
            if dir.as_os_str().is_empty() {
                continue;
            }
            if !self.directories.iter().any(|known| known == dir) {
                self.directories.push(dir.to_path_buf());
            }
        }
        self
    }

    /// Add a file of `len` bytes with epoch timestamps.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, len: u64) -> &mut Self {
        self.insert(MemoryFile::new(path, len))
    }

    /// Add a fully specified file, replacing any file already at that path.
    pub fn insert(&mut self, file: MemoryFile) -> &mut Self {
        if let Some(parent) = file.path.parent() {
            self.add_directory(parent);
        }
        if let Some(existing) = self.files.iter_mut().find(|f| f.path == file.path) {
            *existing = file;
        } else {
            self.files.push(file);
        }
        self
    }

    /// Make reads under `path` fail with a permission error.
    pub fn deny(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.denied.push(path.into());
        self
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn check_access(&self, path: &Path) -> Result<()> {
        if self.denied.iter().any(|denied| path.starts_with(denied)) {
            return Err(FqError::io(
                path,
                IoError::new(ErrorKind::PermissionDenied, "access denied"),
            ));
        }
        Ok(())
    }

    fn file(&self, path: &Path) -> Result<&MemoryFile> {
        self.check_access(path)?;
        self.files
            .iter()
            .find(|f| f.path == path)
            .ok_or_else(|| FqError::io(path, IoError::new(ErrorKind::NotFound, "no such file")))
    }

    fn ensure_listable(&self, path: &Path) -> Result<()> {
        if !self.directory_exists(path) {
            return Err(FqError::io(
                path,
                IoError::new(ErrorKind::NotFound, "no such directory"),
            ));
        }
        self.check_access(path)
    }
}

impl FileSystem for MemoryFileSystem {
    fn directory_exists(&self, path: &Path) -> bool {
        self.directories.iter().any(|dir| dir == path)
    }

    fn enumerate_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.ensure_listable(path)?;
        Ok(self
            .files
            .iter()
            .filter(|f| f.path.parent() == Some(path))
            .map(|f| f.path.clone())
            .collect())
    }

    fn enumerate_directories(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.ensure_listable(path)?;
        Ok(self
            .directories
            .iter()
            .filter(|dir| dir.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn last_write_time(&self, path: &Path) -> Result<SystemTime> {
        Ok(self.file(path)?.modified)
    }

    fn last_access_time(&self, path: &Path) -> Result<SystemTime> {
        Ok(self.file(path)?.accessed)
    }

    fn creation_time(&self, path: &Path) -> Result<SystemTime> {
        Ok(self.file(path)?.created)
    }

    fn file_length(&self, path: &Path) -> Result<u64> {
        Ok(self.file(path)?.len)
    }
}
