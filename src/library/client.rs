//! Zotero Web API v3 client.
//!
//! Authentication is a static API key sent on every request; there is no
//! session or token renewal.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use crate::user_agent;

use super::error::LibraryError;
use super::model::ItemRecord;
use super::LibraryApi;

/// Production API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.zotero.org";

/// Largest page the API serves in one response.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

const API_VERSION: &str = "3";
const API_KEY_HEADER: HeaderName = HeaderName::from_static("zotero-api-key");
const API_VERSION_HEADER: HeaderName = HeaderName::from_static("zotero-api-version");

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 300;

/// Whether the library belongs to a user or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryScope {
    #[default]
    User,
    Group,
}

impl LibraryScope {
    /// URL path segment for this scope.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
        }
    }

    /// Parses `user` / `group`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

/// Connection settings for [`ZoteroClient`].
#[derive(Clone)]
pub struct ZoteroConfig {
    pub library_id: String,
    pub api_key: String,
    pub scope: LibraryScope,
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl ZoteroConfig {
    /// Settings for the production API with default timeouts.
    pub fn new(library_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            library_id: library_id.into(),
            api_key: api_key.into(),
            scope: LibraryScope::User,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ZoteroConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoteroConfig")
            .field("library_id", &self.library_id)
            .field("scope", &self.scope)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// HTTP client for one Zotero library.
///
/// Created once per run and passed by reference to the selector and the
/// materializer.
pub struct ZoteroClient {
    client: Client,
    library_root: Url,
}

impl std::fmt::Debug for ZoteroClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoteroClient")
            .field("library_root", &self.library_root.as_str())
            .finish_non_exhaustive()
    }
}

impl ZoteroClient {
    /// Builds a client for the library described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidUrl`] for a malformed base URL,
    /// [`LibraryError::InvalidApiKey`] for a key that cannot be sent as a
    /// header, and [`LibraryError::ClientBuild`] when the HTTP client cannot be
    /// constructed.
    #[instrument(level = "debug", skip_all, fields(library_id = %config.library_id))]
    pub fn new(config: &ZoteroConfig) -> Result<Self, LibraryError> {
        let library_root = library_root(&config.base_url, config.scope, &config.library_id)?;

        let mut headers = HeaderMap::new();
        let mut key =
            HeaderValue::from_str(&config.api_key).map_err(|_| LibraryError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .default_headers(headers)
            .build()
            .map_err(|source| LibraryError::ClientBuild { source })?;

        debug!(root = %library_root, "library client ready");
        Ok(Self {
            client,
            library_root,
        })
    }

    /// Builds `<root>/items/<segments...>`.
    fn items_url(&self, segments: &[&str]) -> Result<Url, LibraryError> {
        let mut url = self.library_root.clone();
        url.path_segments_mut()
            .map_err(|()| LibraryError::invalid_url(self.library_root.as_str()))?
            .push("items")
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response, LibraryError> {
        debug!(url = %url, "library request");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LibraryError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LibraryError::status(url.as_str(), status.as_u16()));
        }
        Ok(response)
    }

    async fn get_records(&self, url: &Url) -> Result<Vec<ItemRecord>, LibraryError> {
        self.get(url)
            .await?
            .json::<Vec<ItemRecord>>()
            .await
            .map_err(|e| LibraryError::decode(url.as_str(), e))
    }
}

#[async_trait]
impl LibraryApi for ZoteroClient {
    #[instrument(level = "debug", skip(self))]
    async fn list_items(&self, page_size: u32) -> Result<Vec<ItemRecord>, LibraryError> {
        let mut url = self.items_url(&[])?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", &page_size.to_string())
            .append_pair("sort", "dateAdded")
            .append_pair("direction", "desc");
        self.get_records(&url).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn list_children(&self, entry_key: &str) -> Result<Vec<ItemRecord>, LibraryError> {
        let mut url = self.items_url(&[entry_key, "children"])?;
        url.query_pairs_mut().append_pair("format", "json");
        self.get_records(&url).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_content(&self, attachment_key: &str) -> Result<Vec<u8>, LibraryError> {
        let url = self.items_url(&[attachment_key, "file"])?;
        let bytes = self
            .get(&url)
            .await?
            .bytes()
            .await
            .map_err(|e| LibraryError::transport(url.as_str(), e))?;
        debug!(bytes = bytes.len(), "fetched attachment content");
        Ok(bytes.to_vec())
    }
}

fn library_root(base_url: &str, scope: LibraryScope, library_id: &str) -> Result<Url, LibraryError> {
    let mut root = Url::parse(base_url).map_err(|_| LibraryError::invalid_url(base_url))?;
    root.path_segments_mut()
        .map_err(|()| LibraryError::invalid_url(base_url))?
        .pop_if_empty()
        .push(scope.path_segment())
        .push(library_id);
    Ok(root)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_library_root_user_scope() {
        let root = library_root("https://api.zotero.org", LibraryScope::User, "12345").unwrap();
        assert_eq!(root.as_str(), "https://api.zotero.org/users/12345");
    }

    #[test]
    fn test_library_root_group_scope_with_trailing_slash() {
        let root = library_root("http://127.0.0.1:9000/", LibraryScope::Group, "77").unwrap();
        assert_eq!(root.as_str(), "http://127.0.0.1:9000/groups/77");
    }

    #[test]
    fn test_library_root_rejects_garbage_base() {
        let err = library_root("not a url", LibraryScope::User, "1").unwrap_err();
        assert!(matches!(err, LibraryError::InvalidUrl { .. }));
    }

    #[test]
    fn test_items_url_appends_segments() {
        let client = ZoteroClient::new(&ZoteroConfig::new("9", "secret")).unwrap();
        let url = client.items_url(&["ABCD2345", "children"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.zotero.org/users/9/items/ABCD2345/children"
        );
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!(LibraryScope::parse("user"), Some(LibraryScope::User));
        assert_eq!(LibraryScope::parse(" Group "), Some(LibraryScope::Group));
        assert_eq!(LibraryScope::parse("team"), None);
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = ZoteroConfig::new("9", "super-secret-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("library_id"));
    }
}
