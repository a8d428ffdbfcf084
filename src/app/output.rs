//! End-of-run report printed to stdout.

use std::io::{self, Write};

use zotero_recent_core::RunSummary;

pub(crate) const NOTHING_FOUND: &str = "No recent items found.";

/// Lines of the final report.
pub(crate) fn summary_lines(summary: &RunSummary) -> Vec<String> {
    if summary.nothing_found() {
        return vec![NOTHING_FOUND.to_string()];
    }
    vec![
        String::new(),
        "=== Download Summary ===".to_string(),
        format!("Total attachments found: {}", summary.attempted),
        format!("Successfully downloaded: {}", summary.succeeded),
        format!("Failed downloads: {}", summary.failed()),
        format!("Files saved to: {}", summary.output_dir.display()),
    ]
}

pub(crate) fn print_summary(summary: &RunSummary) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for line in summary_lines(summary) {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()
}
