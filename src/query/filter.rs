//! Filter predicates and their aggregation under negation.
//!
//! A query keeps its filters as an ordered list of [`Filter`] values. At
//! `find()` time the list and the negation flag are frozen into a
//! [`FilterPlan`], which is the only place the aggregation rule lives:
//!
//! - not negated: a candidate passes when every filter is true;
//! - negated: a candidate passes when every filter is false.
//!
//! Negation inverts each filter before the conjunction. With filters `A` and
//! `B` a negated plan keeps files matching neither, not files failing
//! `A && B`.

#![allow(missing_docs)]

use std::fmt;
use std::time::SystemTime;

use regex::Regex;

use crate::core::errors::Result;
use crate::query::candidate::Candidate;

/// Caller-supplied predicate over a file timestamp.
pub type TimePredicate = Box<dyn Fn(SystemTime) -> bool>;

/// Caller-supplied predicate over a file length in bytes.
pub type SizePredicate = Box<dyn Fn(u64) -> bool>;

/// One predicate over a candidate file.
pub enum Filter {
    /// Extension equals one of these; stored normalized (see [`normalize_extension`]).
    Extension(Vec<String>),
    /// Base file name matches the expression anywhere (unanchored).
    Name(Regex),
    LastWriteTime(TimePredicate),
    LastAccessTime(TimePredicate),
    CreationTime(TimePredicate),
    Size(SizePredicate),
}

impl Filter {
    /// Extension filter over any number of spellings (`"txt"`, `".TXT"`, ...).
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Extension(
            extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        )
    }

    /// Short label for diagnostics and logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Extension(_) => "extension",
            Self::Name(_) => "name",
            Self::LastWriteTime(_) => "last_write_time",
            Self::LastAccessTime(_) => "last_access_time",
            Self::CreationTime(_) => "creation_time",
            Self::Size(_) => "size",
        }
    }

    /// Evaluate against one candidate, reading only the metadata this filter needs.
    pub fn evaluate(&self, candidate: &Candidate<'_>) -> Result<bool> {
        Ok(match self {
            Self::Extension(wanted) => {
                let ext = candidate.extension().to_lowercase();
                wanted.iter().any(|w| *w == ext)
            }
            Self::Name(pattern) => pattern.is_match(&candidate.file_name()),
            Self::LastWriteTime(pred) => pred(candidate.last_write_time()?),
            Self::LastAccessTime(pred) => pred(candidate.last_access_time()?),
            Self::CreationTime(pred) => pred(candidate.creation_time()?),
            Self::Size(pred) => pred(candidate.size()?),
        })
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(exts) => f.debug_tuple("Extension").field(exts).finish(),
            Self::Name(pattern) => f.debug_tuple("Name").field(&pattern.as_str()).finish(),
            other => f.debug_tuple(other.kind()).finish_non_exhaustive(),
        }
    }
}

/// Lowercase `ext` and give it a leading dot if it lacks one.
pub fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Frozen aggregate predicate: a filter list plus the negation setting.
#[derive(Debug, Clone, Copy)]
pub struct FilterPlan<'q> {
    filters: &'q [Filter],
    negated: bool,
}

impl<'q> FilterPlan<'q> {
    pub const fn new(filters: &'q [Filter], negated: bool) -> Self {
        Self { filters, negated }
    }

    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    pub const fn len(&self) -> usize {
        self.filters.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether `candidate` belongs in the results.
    ///
    /// Stops at the first filter whose (possibly inverted) result is false, so
    /// later filters never read metadata for an already-rejected file. An
    /// empty plan accepts everything, negated or not.
    pub fn passes(&self, candidate: &Candidate<'_>) -> Result<bool> {
        for filter in self.filters {
            if filter.evaluate(candidate)? == self.negated {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
