//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::{Instant, SystemTime};

use chrono::{DateTime, NaiveDate};
use clap::Parser;
use colored::{Colorize, control};
use serde_json::json;
use thiserror::Error;

use file_query::core::config::Config;
use file_query::core::errors::FqError;
use file_query::logger::jsonl::{JsonlWriter, LogEntry};
use file_query::query::engine::{FileQuery, FindOutcome};
use file_query::query::filter::normalize_extension;

/// Command line for finding files by extension, name, timestamps and size.
#[derive(Debug, Parser)]
#[command(
    name = "fq",
    author,
    version,
    about = "Find files under one or more roots",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Directories to search, walked in the order given.
    #[arg(value_name = "ROOT", required = true)]
    roots: Vec<PathBuf>,
    /// Keep files with this extension (repeatable, dot optional, case-insensitive).
    #[arg(short, long = "ext", value_name = "EXT")]
    extensions: Vec<String>,
    /// Keep files whose name matches this regular expression.
    #[arg(short, long, value_name = "REGEX")]
    name: Option<String>,
    /// Keep files for which every filter is false.
    #[arg(long)]
    negate: bool,
    /// Maximum subdirectory levels below each root (0 = root only).
    #[arg(short = 'd', long, value_name = "N")]
    max_depth: Option<usize>,
    /// Keep files of at least this many bytes.
    #[arg(long, value_name = "BYTES")]
    min_size: Option<u64>,
    /// Keep files of at most this many bytes.
    #[arg(long, value_name = "BYTES")]
    max_size: Option<u64>,
    /// Keep files modified after this time (RFC 3339 or YYYY-MM-DD).
    #[arg(long, value_name = "TIME")]
    modified_after: Option<String>,
    /// Keep files modified before this time (RFC 3339 or YYYY-MM-DD).
    #[arg(long, value_name = "TIME")]
    modified_before: Option<String>,
    /// Keep files accessed after this time (RFC 3339 or YYYY-MM-DD).
    #[arg(long, value_name = "TIME")]
    accessed_after: Option<String>,
    /// Keep files created after this time (RFC 3339 or YYYY-MM-DD).
    #[arg(long, value_name = "TIME")]
    created_after: Option<String>,
    /// Print walk counters to stderr.
    #[arg(long)]
    stats: bool,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Append a JSONL activity record to this file.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long)]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("{0}")]
    User(String),
    /// Query or environment failure.
    #[error("{0}")]
    Query(#[from] FqError),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color || !io::stderr().is_terminal() {
        control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;
    let query = build_query(cli, &config)?;

    let log_path = cli.log.clone().or_else(|| config.log.jsonl_path.clone());
    let mut log = log_path.map(JsonlWriter::open);

    let start = Instant::now();
    let result = query.find_with_stats();
    let elapsed = start.elapsed();

    if let Some(writer) = log.as_mut() {
        let entry = match &result {
            Ok(outcome) => LogEntry::query_complete(&outcome.stats, elapsed),
            Err(err) => LogEntry::failure(err),
        };
        writer.write_entry(&entry.with_query(
            query.roots(),
            query.filters().len(),
            query.is_negated(),
        ));
        writer.flush();
    }

    let outcome = result?;
    emit(cli, &outcome)?;
    if cli.stats {
        print_stats(&outcome, elapsed.as_secs_f64());
    }
    Ok(())
}

fn build_query(cli: &Cli, config: &Config) -> Result<FileQuery<'static>, CliError> {
    let mut query = FileQuery::new().add_roots(cli.roots.iter().cloned());

    if cli
        .extensions
        .iter()
        .any(|ext| normalize_extension(ext.trim()) == ".")
    {
        return Err(CliError::User("--ext must not be empty".to_string()));
    }
    let extensions = if cli.extensions.is_empty() {
        &config.query.extensions
    } else {
        &cli.extensions
    };
    if !extensions.is_empty() {
        query = query.with_extensions(extensions);
    }

    if let Some(pattern) = &cli.name {
        query = query.matching(pattern)?;
    }

    if let (Some(min), Some(max)) = (cli.min_size, cli.max_size)
        && min > max
    {
        return Err(CliError::User(format!(
            "--min-size ({min}) must not exceed --max-size ({max})"
        )));
    }
    if let Some(min) = cli.min_size {
        query = query.where_size(move |len| len >= min);
    }
    if let Some(max) = cli.max_size {
        query = query.where_size(move |len| len <= max);
    }

    if let Some(raw) = &cli.modified_after {
        let after = parse_time_arg("--modified-after", raw)?;
        query = query.where_last_write_time(move |t| t > after);
    }
    if let Some(raw) = &cli.modified_before {
        let before = parse_time_arg("--modified-before", raw)?;
        query = query.where_last_write_time(move |t| t < before);
    }
    if let Some(raw) = &cli.accessed_after {
        let after = parse_time_arg("--accessed-after", raw)?;
        query = query.where_last_access_time(move |t| t > after);
    }
    if let Some(raw) = &cli.created_after {
        let after = parse_time_arg("--created-after", raw)?;
        query = query.where_creation_time(move |t| t > after);
    }

    if let Some(depth) = cli.max_depth.or(config.query.max_depth) {
        query = query.with_max_depth(depth);
    }
    if cli.negate {
        query = query.negate();
    }
    Ok(query)
}

/// Accept RFC 3339 (`2026-01-31T12:00:00Z`) or a bare date taken as UTC midnight.
fn parse_time_arg(name: &'static str, raw: &str) -> Result<SystemTime, FqError> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(SystemTime::from(stamp));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| SystemTime::from(midnight.and_utc()))
        .ok_or_else(|| FqError::InvalidArgument {
            name,
            details: format!("{raw:?} is neither RFC 3339 nor YYYY-MM-DD"),
        })
}

fn emit(cli: &Cli, outcome: &FindOutcome) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match output_mode(cli) {
        OutputMode::Human => {
            for path in &outcome.paths {
                writeln!(out, "{}", path.display())?;
            }
        }
        OutputMode::Json => {
            let paths: Vec<String> = outcome
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            let payload = json!({
                "paths": paths,
                "stats": outcome.stats,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
        }
    }
    Ok(())
}

fn print_stats(outcome: &FindOutcome, seconds: f64) {
    let stats = &outcome.stats;
    eprintln!(
        "{} {} matches from {} files in {} directories ({} roots) in {seconds:.3}s",
        "fq:".bold(),
        stats.matches.to_string().as_str().green(),
        stats.files,
        stats.directories,
        stats.roots,
    );
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("FQ_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }
    match env_mode.map(str::trim) {
        Some(mode) if mode.eq_ignore_ascii_case("json") => OutputMode::Json,
        _ => OutputMode::Human,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn output_mode_resolution_honors_precedence() {
        assert_eq!(resolve_output_mode(true, Some("human")), OutputMode::Json);
        assert_eq!(resolve_output_mode(false, Some("JSON")), OutputMode::Json);
        assert_eq!(resolve_output_mode(false, Some("human")), OutputMode::Human);
        assert_eq!(resolve_output_mode(false, None), OutputMode::Human);
    }

    #[test]
    fn parses_rfc3339_and_bare_dates() {
        let day = parse_time_arg("--modified-after", "1970-01-02").unwrap();
        assert_eq!(day, SystemTime::UNIX_EPOCH + Duration::from_secs(86_400));

        let stamp = parse_time_arg("--modified-after", "1970-01-01T00:01:00+00:00").unwrap();
        assert_eq!(stamp, SystemTime::UNIX_EPOCH + Duration::from_secs(60));
    }

    #[test]
    fn rejects_unparseable_time() {
        let err = parse_time_arg("--created-after", "yesterday").unwrap_err();
        assert_eq!(err.code(), "FQ-1102");
        assert!(err.to_string().contains("--created-after"));
    }

    #[test]
    fn cli_collects_filters_in_order() {
        let cli = Cli::try_parse_from([
            "fq", "/tmp", "--ext", "rs", "--ext", ".toml", "--min-size", "1", "--negate",
            "-d", "2",
        ])
        .unwrap();
        let query = build_query(&cli, &Config::default()).unwrap();
        let kinds: Vec<&str> = query.filters().iter().map(|f| f.kind()).collect();
        assert_eq!(kinds, vec!["extension", "size"]);
        assert!(query.is_negated());
        assert_eq!(query.max_depth(), Some(2));
        assert_eq!(query.roots(), [PathBuf::from("/tmp")].as_slice());
    }

    #[test]
    fn config_supplies_defaults_when_flags_absent() {
        let cli = Cli::try_parse_from(["fq", "/tmp"]).unwrap();
        let mut config = Config::default();
        config.query.max_depth = Some(5);
        config.query.extensions = vec![".log".to_string()];
        let query = build_query(&cli, &config).unwrap();
        assert_eq!(query.max_depth(), Some(5));
        assert_eq!(query.filters().len(), 1);
    }

    #[test]
    fn inverted_size_bounds_are_user_error() {
        let cli =
            Cli::try_parse_from(["fq", "/tmp", "--min-size", "10", "--max-size", "1"]).unwrap();
        assert!(matches!(
            build_query(&cli, &Config::default()),
            Err(CliError::User(_))
        ));
    }

    #[test]
    fn empty_extension_flag_is_user_error() {
        for raw in ["", ".", "  "] {
            let cli = Cli::try_parse_from(["fq", "/tmp", "--ext", "rs", "--ext", raw]).unwrap();
            assert!(
                matches!(build_query(&cli, &Config::default()), Err(CliError::User(_))),
                "accepted --ext {raw:?}"
            );
        }
    }

    #[test]
    fn bad_regex_is_reported() {
        let cli = Cli::try_parse_from(["fq", "/tmp", "--name", "(["]).unwrap();
        match build_query(&cli, &Config::default()) {
            Err(CliError::Query(err)) => assert_eq!(err.code(), "FQ-1101"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected regex error"),
        }
    }
}
