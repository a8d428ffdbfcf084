//! Remote reference library access.
//!
//! The rest of the crate talks to the library only through the [`LibraryApi`]
//! trait, so the selector and materializer can be exercised against a fake.
//! [`ZoteroClient`] is the production implementation over the Zotero Web API.

mod client;
mod error;
mod model;

use async_trait::async_trait;

pub use client::{DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, LibraryScope, ZoteroClient, ZoteroConfig};
pub use error::LibraryError;
pub use model::{Attachment, ItemData, ItemRecord, LibraryEntry, LinkMode, UNTITLED_PLACEHOLDER};

/// Operations the downloader needs from a remote library.
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Lists up to `page_size` items, newest `dateAdded` first.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] when the request or decode fails.
    async fn list_items(&self, page_size: u32) -> Result<Vec<ItemRecord>, LibraryError>;

    /// Lists the child items of `entry_key`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] when the request or decode fails.
    async fn list_children(&self, entry_key: &str) -> Result<Vec<ItemRecord>, LibraryError>;

    /// Fetches the stored file bytes of `attachment_key`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] when the request fails.
    async fn fetch_content(&self, attachment_key: &str) -> Result<Vec<u8>, LibraryError>;
}
