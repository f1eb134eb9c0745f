//! Configuration system: TOML file + env var overrides + defaults.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FqError, Result};
use crate::query::filter::normalize_extension;

/// Full fq configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub query: QueryConfig,
    pub log: LogConfig,
}

/// Defaults applied to queries built by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct QueryConfig {
    /// Depth limit used when the command line gives none.
    pub max_depth: Option<usize>,
    /// Extension filter used when the command line gives none.
    pub extensions: Vec<String>,
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LogConfig {
    /// JSONL activity log; no log is written when unset.
    pub jsonl_path: Option<PathBuf>,
}

impl Config {
    /// Default configuration path (`$HOME/.config/fq/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!("[FQ-CONFIG] WARNING: HOME not set, falling back to /tmp for config path");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        home_dir.join(".config").join("fq").join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| FqError::Io {
                path: path_buf.clone(),
                source,
            })?;
            Self::from_toml_str(&raw)?
        } else if path.is_some() {
            return Err(FqError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides_from(env_var)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse the TOML file format without touching the environment.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("FQ_QUERY_MAX_DEPTH") {
            self.query.max_depth = Some(parse_env_usize("FQ_QUERY_MAX_DEPTH", &raw)?);
        }

        if let Some(raw) = lookup("FQ_QUERY_EXTENSIONS") {
            self.query.extensions = raw
                .split(',')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(raw) = lookup("FQ_LOG_JSONL_PATH") {
            self.log.jsonl_path = Some(PathBuf::from(raw));
        }

        Ok(())
    }

    /// Store extensions in the same form the extension filter compares against,
    /// keeping the first occurrence of each.
    fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.query.extensions = self
            .query
            .extensions
            .iter()
            .map(|ext| normalize_extension(ext.trim()))
            .filter(|ext| seen.insert(ext.clone()))
            .collect();
    }

    fn validate(&self) -> Result<()> {
        if self.query.extensions.iter().any(|ext| ext == ".") {
            return Err(FqError::InvalidConfig {
                details: "query.extensions must not contain an empty extension".to_string(),
            });
        }

        if let Some(path) = &self.log.jsonl_path
            && path.as_os_str().is_empty()
        {
            return Err(FqError::InvalidConfig {
                details: "log.jsonl_path must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|error| FqError::InvalidConfig {
            details: format!("{name}={raw:?}: {error}"),
        })
}
