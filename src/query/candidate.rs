//! Lazy view of a file under consideration during a walk.

#![allow(missing_docs)]

use std::fmt;
use std::path::Path;
use std::time::SystemTime;

use crate::core::errors::Result;
use crate::filesystem::FileSystem;

/// A file path paired with the accessor that can describe it.
///
/// Nothing is read up front: each accessor asks the filesystem only when a
/// filter calls it, so a query filtering by extension never stats a file.
#[derive(Clone, Copy)]
pub struct Candidate<'a> {
    path: &'a Path,
    fs: &'a dyn FileSystem,
}

impl<'a> Candidate<'a> {
    pub fn new(path: &'a Path, fs: &'a dyn FileSystem) -> Self {
        Self { path, fs }
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    pub fn file_name(&self) -> String {
        self.fs.file_name(self.path)
    }

    pub fn extension(&self) -> String {
        self.fs.extension(self.path)
    }

    pub fn last_write_time(&self) -> Result<SystemTime> {
        self.fs.last_write_time(self.path)
    }

    pub fn last_access_time(&self) -> Result<SystemTime> {
        self.fs.last_access_time(self.path)
    }

    pub fn creation_time(&self) -> Result<SystemTime> {
        self.fs.creation_time(self.path)
    }

    /// Length in bytes.
    pub fn size(&self) -> Result<u64> {
        self.fs.file_length(self.path)
    }
}

impl fmt::Debug for Candidate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate").field("path", &self.path).finish()
    }
}
