//! What the attached terminal can show, and the stderr log subscriber.

use std::io::IsTerminal;

/// Terminal facts read from the environment once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TerminalCaps {
    pub stderr_tty: bool,
    /// `NO_COLOR` is set to a non-empty value.
    pub no_color_env: bool,
    /// `TERM=dumb`: no cursor movement, no colour.
    pub dumb: bool,
}

impl TerminalCaps {
    pub(crate) fn detect() -> Self {
        Self {
            stderr_tty: std::io::stderr().is_terminal(),
            no_color_env: std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            dumb: std::env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb")),
        }
    }

    pub(crate) fn ansi_logs(self, no_color_flag: bool) -> bool {
        !(no_color_flag || self.no_color_env || self.dumb)
    }

    pub(crate) fn spinner(self, quiet: bool) -> bool {
        self.stderr_tty && !self.dumb && !quiet
    }
}

/// Installs the stderr subscriber. A CLI verbosity flag beats `RUST_LOG`.
pub(crate) fn init_tracing(level: &str, cli_level_wins: bool, ansi: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) if !cli_level_wins => from_env,
        _ => EnvFilter::new(level),
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
}
