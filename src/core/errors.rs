//! FQ-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, FqError>;

/// Top-level error type for file queries.
#[derive(Debug, Error)]
pub enum FqError {
    #[error("[FQ-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[FQ-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[FQ-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FQ-1101] invalid name pattern: {details}")]
    InvalidPattern { details: String },

    #[error("[FQ-1102] invalid argument {name}: {details}")]
    InvalidArgument { name: &'static str, details: String },

    #[error("[FQ-2001] directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("[FQ-3001] permission denied for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("[FQ-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FqError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "FQ-1001",
            Self::MissingConfig { .. } => "FQ-1002",
            Self::ConfigParse { .. } => "FQ-1003",
            Self::InvalidPattern { .. } => "FQ-1101",
            Self::InvalidArgument { .. } => "FQ-1102",
            Self::DirectoryNotFound { .. } => "FQ-2001",
            Self::PermissionDenied { .. } => "FQ-3001",
            Self::Io { .. } => "FQ-3002",
        }
    }

    /// Whether this is the missing-root failure of a query.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DirectoryNotFound { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    ///
    /// Permission failures get their own variant so callers can tell them
    /// apart without inspecting the source.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::Io { path, source }
        }
    }

    #[must_use]
    pub fn directory_not_found(path: impl AsRef<Path>) -> Self {
        Self::DirectoryNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl From<toml::de::Error> for FqError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<regex::Error> for FqError {
    fn from(value: regex::Error) -> Self {
        Self::InvalidPattern {
            details: value.to_string(),
        }
    }
}
