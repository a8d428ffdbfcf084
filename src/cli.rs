//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use zotero_recent_core::LibraryScope;
use zotero_recent_core::library::DEFAULT_API_BASE_URL;

/// Download attachments of recently added Zotero library items.
///
/// Selects top-level items added within the last N days and saves each of
/// their stored PDF or snapshot attachments under a name derived from the
/// item title.
#[derive(Parser, Debug)]
#[command(name = "zotero-recent")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,

    /// Look back this many days (prompted for when omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=36_500))]
    pub days: Option<u32>,

    /// Directory to save files to [default: zotero_recent_downloads_<timestamp>]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of newest items to scan (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: Option<u32>,

    /// Whether the library ID names a user or a group library
    #[arg(long, value_enum, env = "ZOTERO_LIBRARY_TYPE")]
    pub library_type: Option<LibraryTypeArg>,

    /// Zotero user or group ID
    #[arg(long, env = "ZOTERO_LIBRARY_ID", hide_env_values = true)]
    pub library_id: Option<String>,

    /// Zotero API key with read access
    #[arg(long, env = "ZOTERO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Library API base URL
    #[arg(long, env = "ZOTERO_API_BASE_URL", default_value = DEFAULT_API_BASE_URL, hide = true)]
    pub api_base_url: String,
}

/// `--library-type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LibraryTypeArg {
    User,
    Group,
}

impl From<LibraryTypeArg> for LibraryScope {
    fn from(value: LibraryTypeArg) -> Self {
        match value {
            LibraryTypeArg::User => Self::User,
            LibraryTypeArg::Group => Self::Group,
        }
    }
}

impl Args {
    /// True when any verbosity flag was given on the command line.
    pub fn has_verbosity_flag(&self) -> bool {
        self.verbose > 0 || self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        let mut full = vec!["zotero-recent"];
        full.extend_from_slice(args);
        Args::try_parse_from(full)
    }

    #[test]
    fn test_cli_default_args_parse_successfully() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(args.days, None);
        assert_eq!(args.output_dir, None);
        assert_eq!(args.page_size, None);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        assert_eq!(parse(&["-v"]).unwrap().verbose, 1);
        assert_eq!(parse(&["-vv"]).unwrap().verbose, 2);
        assert!(parse(&["-v"]).unwrap().has_verbosity_flag());
        assert!(parse(&["--quiet"]).unwrap().has_verbosity_flag());
    }

    #[test]
    fn test_cli_days_short_and_long() {
        assert_eq!(parse(&["-d", "7"]).unwrap().days, Some(7));
        assert_eq!(parse(&["--days", "0"]).unwrap().days, Some(0));
    }

    #[test]
    fn test_cli_days_rejects_negative() {
        assert!(parse(&["--days", "-3"]).is_err());
        assert!(parse(&["--days", "soon"]).is_err());
    }

    #[test]
    fn test_cli_page_size_range() {
        assert_eq!(parse(&["-p", "100"]).unwrap().page_size, Some(100));
        assert_eq!(
            parse(&["-p", "0"]).unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
        assert_eq!(
            parse(&["--page-size", "101"]).unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_cli_output_dir() {
        let args = parse(&["-o", "papers"]).unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("papers")));
    }

    #[test]
    fn test_cli_library_type_values() {
        let args = parse(&["--library-type", "group"]).unwrap();
        assert_eq!(args.library_type, Some(LibraryTypeArg::Group));
        assert_eq!(
            LibraryScope::from(LibraryTypeArg::Group),
            LibraryScope::Group
        );
        assert_eq!(
            parse(&["--library-type", "team"]).unwrap_err().kind(),
            clap::error::ErrorKind::InvalidValue
        );
    }

    #[test]
    fn test_cli_credentials_flags() {
        let args = parse(&["--library-id", "12345", "--api-key", "secret"]).unwrap();
        assert_eq!(args.library_id.as_deref(), Some("12345"));
        assert_eq!(args.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = parse(&["--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
