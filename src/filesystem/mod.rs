//! Filesystem access capability consumed by the query engine.
//!
//! The engine never touches `std::fs` directly: every existence check,
//! enumeration and metadata read goes through [`FileSystem`]. [`OsFileSystem`]
//! is the default backed by the operating system; [`MemoryFileSystem`] is a
//! pre-populated in-memory fake for tests and dry runs.

pub mod memory;
pub mod os;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::errors::Result;

pub use memory::{MemoryFile, MemoryFileSystem};
pub use os::OsFileSystem;

/// Read-only view of a directory tree.
///
/// Enumeration returns immediate children only. The order of the returned
/// paths is the order the engine visits them in.
pub trait FileSystem {
    /// Whether `path` names an existing directory.
    fn directory_exists(&self, path: &Path) -> bool;

    /// Files directly inside `path`.
    fn enumerate_files(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Subdirectories directly inside `path`.
    fn enumerate_directories(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Last modification time of the file at `path`.
    fn last_write_time(&self, path: &Path) -> Result<SystemTime>;

    /// Last access time of the file at `path`.
    fn last_access_time(&self, path: &Path) -> Result<SystemTime>;

    /// Creation (birth) time of the file at `path`.
    fn creation_time(&self, path: &Path) -> Result<SystemTime>;

    /// Length of the file at `path` in bytes.
    fn file_length(&self, path: &Path) -> Result<u64>;

    /// Base name including extension, without any directory part.
    fn file_name(&self, path: &Path) -> String {
        file_name_of(path)
    }

    /// Extension including the leading dot, or an empty string if none.
    fn extension(&self, path: &Path) -> String {
        extension_of(path)
    }
}

/// Base name of `path`, lossily converted to UTF-8.
#[must_use]
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension of `path` with its leading dot (`"a/b.TXT"` -> `".TXT"`).
#[must_use]
pub fn extension_of(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
        _ => String::new(),
    }
}
