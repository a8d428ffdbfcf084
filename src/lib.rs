//! Zotero Recent Core Library
//!
//! Downloads the stored file attachments of entries recently added to a Zotero
//! library, under names derived from each entry's title.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`library`] - Remote library API trait and the Zotero Web API client
//! - [`select`] - Recency scan over the newest-first item feed
//! - [`download`] - Attachment listing, local naming, and file writes
//! - [`run`] - Sequential orchestration of a whole run

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod library;
pub mod run;
pub mod select;
mod user_agent;

// Re-export commonly used types
pub use download::{
    DownloadTarget, MaterializeError, classify_extension, list_attachments, materialize,
    resolve_unique_name, sanitize_title,
};
pub use library::{
    Attachment, LibraryApi, LibraryEntry, LibraryError, LibraryScope, LinkMode, ZoteroClient,
    ZoteroConfig,
};
pub use run::{NoopObserver, RunObserver, RunOptions, RunSummary, download_recent};
pub use select::{RecentSelection, scan_recent, select_recent, select_recent_at};
