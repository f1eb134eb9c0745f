#![forbid(unsafe_code)]

//! Fluent builder for finding files in a directory tree.
//!
//! A query collects search roots, filters (extension, name pattern,
//! timestamps, size), an optional negation and a depth limit, then
//! [`find`](query::engine::FileQuery::find) walks each root depth-first and
//! returns the matching files.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use file_query::prelude::*;
//!
//! let sources = FileQuery::new()
//!     .add_roots(["src", "tests"])
//!     .with_extension("rs")
//!     .matching("^test_")?
//!     .negate()
//!     .find()?;
//! # Ok::<(), FqError>(())
//! ```
//!
//! Any [`FileSystem`](filesystem::FileSystem) can stand in for the real one,
//! for example the in-memory fake:
//!
//! ```rust
//! use file_query::filesystem::MemoryFileSystem;
//! use file_query::query::engine::FileQuery;
//!
//! let mut fs = MemoryFileSystem::new();
//! fs.add_file("/test/1.txt", 1).add_file("/test/2.etc", 0);
//!
//! let found = FileQuery::with_file_system(&fs)
//!     .add_root("/test")
//!     .with_extension("txt")
//!     .find()
//!     .unwrap();
//! assert_eq!(found, vec![std::path::PathBuf::from("/test/1.txt")]);
//! ```

pub mod prelude;

pub mod core;
pub mod filesystem;
pub mod logger;
pub mod query;
