//! CLI entry point for zotero-recent.

use std::io;

use anyhow::{Context, Result};
use chrono::{Local, TimeDelta};
use clap::Parser;
use tracing::{debug, info};
use zotero_recent_core::{RunOptions, ZoteroClient, ZoteroConfig, download_recent};

mod app;
mod cli;

use app::config::load_default_file_config;
use app::credentials::require_credentials;
use app::output::print_summary;
use app::progress::Progress;
use app::prompt::read_days;
use app::settings::resolve_settings;
use app::terminal::{TerminalCaps, init_tracing};
use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed flags
    let dotenv = dotenvy::dotenv();

    // Usage errors exit 1 like every other configuration error
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };
    let loaded = load_default_file_config()?;
    let settings = resolve_settings(&args, loaded.config.as_ref(), Local::now());

    let terminal = TerminalCaps::detect();
    init_tracing(
        settings.log_level,
        settings.force_cli_level,
        terminal.ansi_logs(args.no_color),
    );

    match &dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => debug!(error = %e, "Failed to load .env"),
    }
    match (&loaded.path, &loaded.config) {
        (Some(path), Some(_)) => debug!(path = %path.display(), "Loaded config file"),
        (Some(path), None) => debug!(path = %path.display(), "No config file"),
        (None, _) => debug!("No config directory resolved"),
    }
    debug!(?settings, "Resolved settings");

    let credentials = require_credentials(args.library_id.as_deref(), args.api_key.as_deref())?;

    let days = match args.days {
        Some(days) => days,
        None => read_days(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let mut config = ZoteroConfig::new(credentials.library_id, credentials.api_key);
    config.scope = settings.scope;
    config.base_url.clone_from(&args.api_base_url);
    if let Some(secs) = settings.connect_timeout_secs {
        config.connect_timeout_secs = secs;
    }
    if let Some(secs) = settings.read_timeout_secs {
        config.read_timeout_secs = secs;
    }
    let client = ZoteroClient::new(&config).context("Failed to create library client")?;

    let mut options = RunOptions::new(TimeDelta::days(i64::from(days)), &settings.output_dir);
    options.page_size = settings.page_size;
    info!(
        library_id = %config.library_id,
        scope = ?config.scope,
        "zotero-recent starting"
    );

    let progress = Progress::new(terminal.spinner(settings.quiet));
    let summary = download_recent(&client, &options, progress.observer()).await;
    progress.finish();

    print_summary(&summary)?;
    Ok(())
}
