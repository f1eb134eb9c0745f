//! Fluent file query: roots, filters and a depth limit, then one walk.
//!
//! ```rust,no_run
//! use file_query::query::engine::FileQuery;
//!
//! let logs = FileQuery::new()
//!     .add_root("/var/log")
//!     .with_extension("log")
//!     .where_size(|len| len > 1024 * 1024)
//!     .with_max_depth(2)
//!     .find()?;
//! # Ok::<(), file_query::core::errors::FqError>(())
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use regex::Regex;
use serde::Serialize;

use crate::core::errors::{FqError, Result};
use crate::filesystem::{FileSystem, OsFileSystem};
use crate::query::candidate::Candidate;
use crate::query::filter::{Filter, FilterPlan};

static OS_FILE_SYSTEM: OsFileSystem = OsFileSystem;

/// Counters gathered during one [`FileQuery::find_with_stats`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FindStats {
    /// Roots walked, counting repeats.
    pub roots: usize,
    /// Directories listed, roots included.
    pub directories: usize,
    /// Files offered to the filters.
    pub files: usize,
    /// Files that passed.
    pub matches: usize,
}

/// Result of a walk together with its counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOutcome {
    /// Matching files, in walk order.
    pub paths: Vec<PathBuf>,
    /// What the walk touched.
    pub stats: FindStats,
}

/// Builder that accumulates roots, filters and limits, then walks on [`find`](Self::find).
///
/// Walk order for each root, in the order roots were added:
/// - the files of a directory, in accessor enumeration order;
/// - then each subdirectory in enumeration order, fully, before the next.
///
/// Only files are returned; directory names are never filtered and the depth
/// limit is the only thing that stops descent. Results from several roots are
/// concatenated without de-duplication.
///
/// Safety invariants:
/// - Every distinct root is checked before any directory is listed; one
///   missing root fails the whole call with no partial results
/// - Any enumeration or metadata failure aborts the walk
/// - Traversal uses an explicit stack, so unbounded depth cannot overflow
pub struct FileQuery<'fs> {
    fs: &'fs dyn FileSystem,
    roots: Vec<PathBuf>,
    filters: Vec<Filter>,
    negated: bool,
    max_depth: Option<usize>,
    missing_root: Option<PathBuf>,
}

impl FileQuery<'static> {
    /// Query against the operating-system filesystem.
    pub fn new() -> Self {
        Self::with_file_system(&OS_FILE_SYSTEM)
    }
}

impl Default for FileQuery<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'fs> FileQuery<'fs> {
    /// Query against a caller-provided accessor, borrowed for the query's lifetime.
    pub fn with_file_system(fs: &'fs dyn FileSystem) -> Self {
        Self {
            fs,
            roots: Vec::new(),
            filters: Vec::new(),
            negated: false,
            max_depth: None,
            missing_root: None,
        }
    }

    /// Append the distinct paths of this batch as roots.
    ///
    /// Duplicates are dropped only within `paths`; a root already added by an
    /// earlier call is appended again and walked twice. Roots added before
    /// this call are re-checked for existence now; if one has vanished, the
    /// failure is held and returned by the next [`find`](Self::find). The new
    /// roots themselves are checked when `find` runs.
    #[must_use]
    pub fn add_roots<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        if self.missing_root.is_none() {
            self.missing_root = self
                .roots
                .iter()
                .find(|root| !self.fs.directory_exists(root))
                .cloned();
        }

        let mut seen = HashSet::new();
        for path in paths {
            let path = path.into();
            if seen.insert(path.clone()) {
                self.roots.push(path);
            }
        }
        self
    }

    /// Append one root. See [`add_roots`](Self::add_roots).
    #[must_use]
    pub fn add_root(self, path: impl Into<PathBuf>) -> Self {
        self.add_roots([path.into()])
    }

    /// Keep files whose extension is `extension`, with or without the leading
    /// dot, compared case-insensitively.
    #[must_use]
    pub fn with_extension(self, extension: &str) -> Self {
        self.with_extensions([extension])
    }

    /// Keep files whose extension is any of `extensions`.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filters.push(Filter::extensions(extensions));
        self
    }

    /// Keep files whose base name contains a match for the regular expression.
    pub fn matching(self, pattern: &str) -> Result<Self> {
        Ok(self.matching_regex(Regex::new(pattern)?))
    }

    /// [`matching`](Self::matching) with an already-compiled expression.
    #[must_use]
    pub fn matching_regex(mut self, pattern: Regex) -> Self {
        self.filters.push(Filter::Name(pattern));
        self
    }

    /// Invert every filter before they are combined.
    ///
    /// A negated query keeps files for which *each* filter is false. Calling
    /// this again leaves the query negated.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    /// Keep files whose last modification time satisfies `predicate`.
    #[must_use]
    pub fn where_last_write_time<F>(mut self, predicate: F) -> Self
    where
        F: Fn(SystemTime) -> bool + 'static,
    {
        self.filters.push(Filter::LastWriteTime(Box::new(predicate)));
        self
    }

    /// Keep files whose last access time satisfies `predicate`.
    #[must_use]
    pub fn where_last_access_time<F>(mut self, predicate: F) -> Self
    where
        F: Fn(SystemTime) -> bool + 'static,
    {
        self.filters.push(Filter::LastAccessTime(Box::new(predicate)));
        self
    }

    /// Keep files whose creation time satisfies `predicate`.
    #[must_use]
    pub fn where_creation_time<F>(mut self, predicate: F) -> Self
    where
        F: Fn(SystemTime) -> bool + 'static,
    {
        self.filters.push(Filter::CreationTime(Box::new(predicate)));
        self
    }

    /// Keep files whose length in bytes satisfies `predicate`.
    #[must_use]
    pub fn where_size<F>(mut self, predicate: F) -> Self
    where
        F: Fn(u64) -> bool + 'static,
    {
        self.filters.push(Filter::Size(Box::new(predicate)));
        self
    }

    /// Limit descent below each root; `0` lists the root's own files only.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Roots in walk order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Filters in evaluation order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Configured depth limit; `None` means unbounded.
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Whether [`negate`](Self::negate) has been called.
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// The aggregate predicate `find` will apply, frozen from current state.
    pub fn filter_plan(&self) -> FilterPlan<'_> {
        FilterPlan::new(&self.filters, self.negated)
    }

    /// Walk every root and return the matching files.
    pub fn find(&self) -> Result<Vec<PathBuf>> {
        self.find_with_stats().map(|outcome| outcome.paths)
    }

    /// [`find`](Self::find), also reporting what the walk touched.
    pub fn find_with_stats(&self) -> Result<FindOutcome> {
        if let Some(root) = &self.missing_root {
            return Err(FqError::directory_not_found(root));
        }
        self.check_roots()?;

        let plan = self.filter_plan();
        let mut outcome = FindOutcome::default();
        for root in &self.roots {
            self.walk_root(root, plan, &mut outcome)?;
            outcome.stats.roots += 1;
        }
        outcome.stats.matches = outcome.paths.len();
        Ok(outcome)
    }

    fn check_roots(&self) -> Result<()> {
        let mut checked: HashSet<&Path> = HashSet::new();
        for root in &self.roots {
            if checked.insert(root.as_path()) && !self.fs.directory_exists(root) {
                return Err(FqError::directory_not_found(root));
            }
        }
        Ok(())
    }

    /// Pre-order walk of one root.
    ///
    /// Subdirectories are pushed in reverse so the first one enumerated is
    /// popped, and finished, first.
    fn walk_root(
        &self,
        root: &Path,
        plan: FilterPlan<'_>,
        outcome: &mut FindOutcome,
    ) -> Result<()> {
        let mut pending: Vec<(PathBuf, usize)> = vec![(root.to_path_buf(), 0)];

        while let Some((dir, depth)) = pending.pop() {
            outcome.stats.directories += 1;

            for file in self.fs.enumerate_files(&dir)? {
                outcome.stats.files += 1;
                if plan.passes(&Candidate::new(&file, self.fs))? {
                    outcome.paths.push(file);
                }
            }

            if self.max_depth.is_some_and(|limit| depth >= limit) {
                continue;
            }
            let children = self.fs.enumerate_directories(&dir)?;
            pending.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }

        Ok(())
    }
}
