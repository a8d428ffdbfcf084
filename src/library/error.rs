//! Error types for remote library operations.
//!
//! Request-level variants carry the URL so a log line is enough to tell
//! which call failed.

use thiserror::Error;

/// Errors returned by [`LibraryApi`](super::LibraryApi) implementations.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The API key was rejected or lacks access to the library.
    #[error(
        "[AUTH] library API rejected credentials (HTTP {status}) requesting {url}\n  Suggestion: check ZOTERO_LIBRARY_ID and ZOTERO_API_KEY at https://www.zotero.org/settings/keys"
    )]
    AuthRequired {
        /// The URL that was rejected.
        url: String,
        /// 401 or 403.
        status: u16,
    },

    /// Any other non-success HTTP response.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Response body was not the JSON shape we expect.
    #[error("unexpected response format from {url}: {source}")]
    Decode {
        /// The URL whose body failed to decode.
        url: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// The configured base URL or a derived endpoint is not a valid URL.
    #[error("invalid library API URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// The API key contains characters that cannot be sent in a header.
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl LibraryError {
    /// Creates a network error, promoting timeouts to [`LibraryError::Timeout`].
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates the error for a non-success status, promoting 401/403 to
    /// [`LibraryError::AuthRequired`].
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        if matches!(status, 401 | 403) {
            Self::AuthRequired {
                url: url.into(),
                status,
            }
        } else {
            Self::HttpStatus {
                url: url.into(),
                status,
            }
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns true for credential rejections.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }
}
