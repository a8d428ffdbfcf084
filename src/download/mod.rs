//! Attachment materialization: naming, fetching and writing files.
//!
//! # Naming
//!
//! - Base name: the owning entry's title, sanitized ([`sanitize_title`])
//! - Extension: `.pdf` or `.html` from the declared content type
//!   ([`classify_extension`])
//! - Collisions: `_1`, `_2`, ... suffixes, checked against the directory on
//!   disk before every write ([`resolve_unique_name`])
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use zotero_recent_core::download::{list_attachments, materialize};
//! use zotero_recent_core::library::{LibraryEntry, ZoteroClient, ZoteroConfig};
//!
//! # async fn example(entry: LibraryEntry) -> Result<(), Box<dyn std::error::Error>> {
//! let client = ZoteroClient::new(&ZoteroConfig::new("12345", "api-key"))?;
//! for attachment in list_attachments(&client, &entry.key).await {
//!     let target = materialize(&client, &attachment, &entry, Path::new("./downloads")).await?;
//!     println!("Saved {}", target.path().display());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod filename;
mod materializer;

pub use error::MaterializeError;
pub use filename::{
    DownloadTarget, FALLBACK_NAME, HTML_EXTENSION, MAX_TITLE_CHARS, PDF_EXTENSION,
    classify_extension, resolve_unique_name, sanitize_title,
};
pub use materializer::{list_attachments, materialize, write_bytes};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, MaterializeError>` explicitly in function signatures.
