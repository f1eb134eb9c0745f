//! Operating-system backed [`FileSystem`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::errors::{FqError, Result};
use crate::filesystem::FileSystem;

/// Default accessor backed by `std::fs`.
///
/// Children are returned sorted by file name so a walk is reproducible across
/// platforms whose `read_dir` order differs. Symlinks are classified by their
/// target; dangling links are neither files nor directories and are skipped.
/// Any other failure to resolve a link target aborts the enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OsFileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildKind {
    File,
    Directory,
}

impl OsFileSystem {
    fn children(path: &Path, wanted: ChildKind) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(path).map_err(|source| FqError::io(path, source))?;

        let mut children = Vec::new();
        for entry_result in entries {
            let entry = entry_result.map_err(|source| FqError::io(path, source))?;
            let child_path = entry.path();

            let ft = entry
                .file_type()
                .map_err(|source| FqError::io(&child_path, source))?;

            let kind = if ft.is_symlink() {
                match fs::metadata(&child_path) {
                    Ok(target) if target.is_dir() => ChildKind::Directory,
                    Ok(target) if target.is_file() => ChildKind::File,
                    Ok(_) => continue,
                    // Dangling link.
                    Err(err) if err.kind() == ErrorKind::NotFound => continue,
                    Err(source) => return Err(FqError::io(&child_path, source)),
                }
            } else if ft.is_dir() {
                ChildKind::Directory
            } else if ft.is_file() {
                ChildKind::File
            } else {
                // Sockets, FIFOs and device nodes.
                continue;
            };

            if kind == wanted {
                children.push(child_path);
            }
        }

        children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(children)
    }

    fn metadata(path: &Path) -> Result<fs::Metadata> {
        fs::metadata(path).map_err(|source| FqError::io(path, source))
    }
}

impl FileSystem for OsFileSystem {
    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn enumerate_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        Self::children(path, ChildKind::File)
    }

    fn enumerate_directories(&self, path: &Path) -> Result<Vec<PathBuf>> {
        Self::children(path, ChildKind::Directory)
    }

    fn last_write_time(&self, path: &Path) -> Result<SystemTime> {
        Self::metadata(path)?
            .modified()
            .map_err(|source| FqError::io(path, source))
    }

    fn last_access_time(&self, path: &Path) -> Result<SystemTime> {
        Self::metadata(path)?
            .accessed()
            .map_err(|source| FqError::io(path, source))
    }

    /// Fails with an IO error on filesystems that do not record birth time.
    fn creation_time(&self, path: &Path) -> Result<SystemTime> {
        Self::metadata(path)?
            .created()
            .map_err(|source| FqError::io(path, source))
    }

    fn file_length(&self, path: &Path) -> Result<u64> {
        Ok(Self::metadata(path)?.len())
    }
}
