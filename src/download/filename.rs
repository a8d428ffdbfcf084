//! Deterministic local naming for downloaded attachments.
//!
//! The local name comes from the owning entry's title and the attachment's
//! declared content type. The library-assigned filename is never used.

use std::path::{Path, PathBuf};

/// Maximum length, in characters, of a sanitized title.
pub const MAX_TITLE_CHARS: usize = 200;

/// Name used when sanitization leaves nothing.
pub const FALLBACK_NAME: &str = "untitled";

/// Extension for PDF-like content.
pub const PDF_EXTENSION: &str = ".pdf";

/// Extension for everything else (web snapshots).
pub const HTML_EXTENSION: &str = ".html";

/// A resolved write location, unique in its directory when computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub dir: PathBuf,
    pub file_name: String,
}

impl DownloadTarget {
    /// Full path of the target file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Turns an entry title into a filesystem-safe base name.
///
/// Steps, in order:
/// 1. each of `< > : " | ? * \ /` becomes `_`
/// 2. every run of underscores and/or whitespace becomes one `_`
/// 3. leading and trailing spaces and dots are trimmed
/// 4. the result is cut to [`MAX_TITLE_CHARS`] characters
/// 5. an empty result becomes [`FALLBACK_NAME`]
#[must_use]
pub fn sanitize_title(raw_title: &str) -> String {
    let mut collapsed = String::with_capacity(raw_title.len());
    let mut in_separator_run = false;
    for ch in raw_title.chars() {
        let is_separator = is_reserved(ch) || ch == '_' || is_title_space(ch);
        if is_separator {
            if !in_separator_run {
                collapsed.push('_');
                in_separator_run = true;
            }
        } else {
            collapsed.push(ch);
            in_separator_run = false;
        }
    }

    let trimmed = collapsed.trim_matches(|c| c == ' ' || c == '.');
    let truncated: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();

    if truncated.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        truncated
    }
}

fn is_reserved(ch: char) -> bool {
    matches!(ch, '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\\' | '/')
}

/// Unicode white space plus the information separators U+001C..U+001F.
fn is_title_space(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

/// Picks `.pdf` when the content type mentions `pdf`, `.html` otherwise.
///
/// Only these two extensions are ever produced, whatever the payload really is.
#[must_use]
pub fn classify_extension(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some(kind) if kind.contains("pdf") => PDF_EXTENSION,
        _ => HTML_EXTENSION,
    }
}

/// Returns the first free name among `base+ext`, `base_1+ext`, `base_2+ext`, ...
///
/// Checks the directory as it is right now. Two writers racing on the same
/// directory can both receive the same name.
#[must_use]
pub fn resolve_unique_name(base: &str, ext: &str, dir: &Path) -> String {
    let candidate = format!("{base}{ext}");
    if !dir.join(&candidate).exists() {
        return candidate;
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{base}_{counter}{ext}");
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}
