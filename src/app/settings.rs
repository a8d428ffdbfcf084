//! Merges CLI flags, config-file defaults and built-in defaults.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use zotero_recent_core::LibraryScope;
use zotero_recent_core::library::DEFAULT_PAGE_SIZE;

use super::config::FileConfig;
use crate::cli::Args;

/// Prefix of the timestamped default output directory.
pub(crate) const DEFAULT_OUTPUT_PREFIX: &str = "zotero_recent_downloads_";

/// Effective run settings. CLI and environment win over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub log_level: &'static str,
    /// True when a CLI verbosity flag should override `RUST_LOG`.
    pub force_cli_level: bool,
    pub quiet: bool,
    pub scope: LibraryScope,
    pub output_dir: PathBuf,
    pub page_size: u32,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

pub(crate) fn resolve_settings(
    args: &Args,
    file: Option<&FileConfig>,
    now: DateTime<Local>,
) -> Settings {
    let file = file.cloned().unwrap_or_default();

    let (log_level, quiet) = if args.has_verbosity_flag() {
        (cli_log_level(args.quiet, args.verbose), args.quiet)
    } else if let Some(verbosity) = file.verbosity {
        (
            verbosity.log_level(),
            verbosity == super::config::VerbositySetting::Quiet,
        )
    } else {
        ("info", false)
    };

    Settings {
        log_level,
        force_cli_level: args.has_verbosity_flag(),
        quiet,
        scope: args
            .library_type
            .map(LibraryScope::from)
            .or(file.library_type)
            .unwrap_or_default(),
        output_dir: args
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| default_output_dir(now)),
        page_size: args
            .page_size
            .or(file.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE),
        connect_timeout_secs: file.connect_timeout_secs,
        read_timeout_secs: file.read_timeout_secs,
    }
}

fn cli_log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// `zotero_recent_downloads_<YYYY-MM-DD-HHMM>` in the working directory.
pub(crate) fn default_output_dir(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "{DEFAULT_OUTPUT_PREFIX}{}",
        now.format("%Y-%m-%d-%H%M")
    ))
}
