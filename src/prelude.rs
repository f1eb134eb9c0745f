//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use file_query::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{FqError, Result};

// Filesystem access
pub use crate::filesystem::{FileSystem, MemoryFile, MemoryFileSystem, OsFileSystem};

// Query
pub use crate::query::candidate::Candidate;
pub use crate::query::engine::{FileQuery, FindOutcome, FindStats};
pub use crate::query::filter::{Filter, FilterPlan};
