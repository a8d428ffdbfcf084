//! One complete download run: select recent entries, then materialize every
//! stored attachment of each, one at a time.
//!
//! Failures below the run level (feed, children, content, write) are logged and
//! counted; none of them stops the run.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use tracing::{info, warn};

use crate::download::{DownloadTarget, MaterializeError, list_attachments, materialize};
use crate::library::{Attachment, DEFAULT_PAGE_SIZE, LibraryApi, LibraryEntry, LibraryError};
use crate::select::select_recent;

/// Inputs for [`download_recent`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// How far back from now to select entries.
    pub lookback: TimeDelta,
    /// Directory files are written to (created on first write).
    pub output_dir: PathBuf,
    /// Feed page size; entries beyond it are not considered.
    pub page_size: u32,
}

impl RunOptions {
    /// Options with the default page size.
    pub fn new(lookback: TimeDelta, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            lookback,
            output_dir: output_dir.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Progress hooks for a run. All methods default to doing nothing.
pub trait RunObserver {
    fn entries_selected(&self, _count: usize) {}

    fn entry_started(&self, _index: usize, _total: usize, _entry: &LibraryEntry) {}

    fn attachment_finished(
        &self,
        _entry: &LibraryEntry,
        _attachment: &Attachment,
        _outcome: &Result<DownloadTarget, MaterializeError>,
    ) {
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Counts reported at the end of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Entries selected by the recency scan.
    pub entries_found: usize,
    /// Stored-file attachments found across those entries.
    pub attempted: usize,
    /// Attachments written to disk.
    pub succeeded: usize,
    /// Output directory as an absolute path.
    pub output_dir: PathBuf,
    /// Set when the item feed could not be fetched at all.
    pub feed_error: Option<LibraryError>,
    /// Files written, in processing order.
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    /// Attachments that were attempted but not written.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    /// True when the scan selected nothing (or the feed fetch failed).
    #[must_use]
    pub fn nothing_found(&self) -> bool {
        self.entries_found == 0
    }
}

/// Downloads the stored attachments of every entry added within
/// `options.lookback`.
#[tracing::instrument(skip_all, fields(output_dir = %options.output_dir.display()))]
pub async fn download_recent(
    api: &dyn LibraryApi,
    options: &RunOptions,
    observer: &dyn RunObserver,
) -> RunSummary {
    let mut summary = RunSummary {
        output_dir: absolute_output_dir(&options.output_dir),
        ..RunSummary::default()
    };

    info!(
        days = options.lookback.num_days(),
        "Fetching items added in the past {} days...",
        options.lookback.num_days()
    );
    let selection = select_recent(api, options.lookback, options.page_size).await;
    summary.feed_error = selection.fetch_error;
    summary.entries_found = selection.entries.len();
    observer.entries_selected(summary.entries_found);

    if selection.entries.is_empty() {
        info!("No recent items found.");
        return summary;
    }
    info!(count = summary.entries_found, "Found {} recent items.", summary.entries_found);

    let total = selection.entries.len();
    for (index, entry) in selection.entries.iter().enumerate() {
        observer.entry_started(index, total, entry);
        info!(key = %entry.key, "Processing: {}", entry.title);

        let attachments = list_attachments(api, &entry.key).await;
        if attachments.is_empty() {
            info!(key = %entry.key, "No file attachments found.");
            continue;
        }
        info!(key = %entry.key, count = attachments.len(), "Found {} attachment(s)", attachments.len());

        for attachment in &attachments {
            summary.attempted += 1;
            let outcome = materialize(api, attachment, entry, &options.output_dir).await;
            match &outcome {
                Ok(target) => {
                    summary.succeeded += 1;
                    summary.written.push(target.path());
                }
                Err(e) => {
                    warn!(key = %e.key(), error = %e, "Error downloading attachment");
                }
            }
            observer.attachment_finished(entry, attachment, &outcome);
        }
    }

    info!(
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        failed = summary.failed(),
        "Download complete"
    );
    summary
}

fn absolute_output_dir(dir: &Path) -> PathBuf {
    std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}
