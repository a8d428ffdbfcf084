//! Error types for materializing a single attachment.
//!
//! Each failure names the attachment it belongs to so the orchestrator can log
//! it and move on to the next one.

use std::path::PathBuf;

use thiserror::Error;

use crate::library::LibraryError;

/// Why one attachment could not be written to disk.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The stored file could not be fetched from the library.
    #[error("failed to fetch content of attachment {key}: {source}")]
    Fetch {
        /// Attachment key.
        key: String,
        /// The underlying library error.
        #[source]
        source: LibraryError,
    },

    /// File system error while preparing the directory or writing the file.
    #[error("IO error writing attachment {key} to {path}: {source}")]
    Io {
        /// Attachment key.
        key: String,
        /// The path being created or written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl MaterializeError {
    /// Creates a fetch error.
    pub fn fetch(key: impl Into<String>, source: LibraryError) -> Self {
        Self::Fetch {
            key: key.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(key: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            path: path.into(),
            source,
        }
    }

    /// Key of the attachment that failed.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Fetch { key, .. } | Self::Io { key, .. } => key,
        }
    }
}

// No `From<LibraryError>` / `From<std::io::Error>`: every variant needs the
// attachment key, which the source errors do not carry.
