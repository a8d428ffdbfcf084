//! Progress UI (spinner) for download runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use zotero_recent_core::{
    Attachment, DownloadTarget, LibraryEntry, MaterializeError, NoopObserver, RunObserver,
};

/// Spinner that tracks which entry is being processed.
pub(crate) struct SpinnerObserver {
    spinner: ProgressBar,
}

impl SpinnerObserver {
    pub(crate) fn start() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Fetching recent items...");
        Self { spinner }
    }

    pub(crate) fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl RunObserver for SpinnerObserver {
    fn entries_selected(&self, count: usize) {
        if count == 0 {
            self.spinner.finish_and_clear();
        }
    }

    fn entry_started(&self, index: usize, total: usize, entry: &LibraryEntry) {
        self.spinner
            .set_message(entry_message(index, total, &entry.title));
    }

    fn attachment_finished(
        &self,
        _entry: &LibraryEntry,
        attachment: &Attachment,
        outcome: &Result<DownloadTarget, MaterializeError>,
    ) {
        if outcome.is_err() {
            self.spinner
                .println(format!("  failed: {}", attachment.display_name()));
        }
    }
}

/// Picks the spinner or a silent observer.
pub(crate) enum Progress {
    Spinner(SpinnerObserver),
    Silent(NoopObserver),
}

impl Progress {
    pub(crate) fn new(use_spinner: bool) -> Self {
        if use_spinner {
            Self::Spinner(SpinnerObserver::start())
        } else {
            Self::Silent(NoopObserver)
        }
    }

    pub(crate) fn observer(&self) -> &dyn RunObserver {
        match self {
            Self::Spinner(spinner) => spinner,
            Self::Silent(noop) => noop,
        }
    }

    pub(crate) fn finish(&self) {
        if let Self::Spinner(spinner) = self {
            spinner.finish();
        }
    }
}

fn entry_message(index: usize, total: usize, title: &str) -> String {
    const MAX_TITLE: usize = 60;
    let shown: String = if title.chars().count() > MAX_TITLE {
        let mut cut: String = title.chars().take(MAX_TITLE - 1).collect();
        cut.push('…');
        cut
    } else {
        title.to_string()
    };
    format!("[{}/{}] {}", index + 1, total, shown)
}
