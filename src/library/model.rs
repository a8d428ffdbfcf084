//! Library records: the raw wire shape and the typed views built from it.

use serde::Deserialize;

/// Title used when an entry has none.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled";

/// Item type of child records that may carry a file.
const ATTACHMENT_ITEM_TYPE: &str = "attachment";

// ==================== Wire Types ====================

/// One element of an items or children listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub key: String,
    #[serde(default)]
    pub data: ItemData,
}

/// The `data` object of an item record. Only the fields we read are declared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub date_added: Option<String>,
    pub parent_item: Option<String>,
    pub content_type: Option<String>,
    pub link_mode: Option<String>,
    pub filename: Option<String>,
}

// ==================== Typed Views ====================

/// A bibliographic record fetched from the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub key: String,
    pub title: String,
    pub date_added: Option<String>,
    pub parent_item: Option<String>,
}

impl LibraryEntry {
    /// True when the entry is not a child of another item.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent_item.as_deref().is_none_or(str::is_empty)
    }
}

impl From<ItemRecord> for LibraryEntry {
    fn from(record: ItemRecord) -> Self {
        let ItemRecord { key, data } = record;
        Self {
            key,
            title: data
                .title
                .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string()),
            date_added: data.date_added,
            parent_item: data.parent_item,
        }
    }
}

/// How an attachment's content is held by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkMode {
    ImportedFile,
    ImportedUrl,
    LinkedFile,
    LinkedUrl,
    EmbeddedImage,
    Other(String),
}

impl LinkMode {
    /// Parses the library's `linkMode` string.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "imported_file" => Self::ImportedFile,
            "imported_url" => Self::ImportedUrl,
            "linked_file" => Self::LinkedFile,
            "linked_url" => Self::LinkedUrl,
            "embedded_image" => Self::EmbeddedImage,
            other => Self::Other(other.to_string()),
        }
    }

    /// True when the library holds a copy of the file that can be fetched.
    #[must_use]
    pub fn is_stored_file(&self) -> bool {
        matches!(self, Self::ImportedFile | Self::ImportedUrl)
    }
}

/// A child record that carries (or links to) a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub key: String,
    pub content_type: Option<String>,
    /// Name assigned by the library. Advisory only; never used for local naming.
    pub filename: Option<String>,
    pub link_mode: LinkMode,
}

impl Attachment {
    /// Builds an attachment view when the record is an attachment item.
    ///
    /// Returns `None` for notes, annotations and other child item types.
    #[must_use]
    pub fn from_record(record: ItemRecord) -> Option<Self> {
        let ItemRecord { key, data } = record;
        if data.item_type.as_deref() != Some(ATTACHMENT_ITEM_TYPE) {
            return None;
        }
        Some(Self {
            key,
            content_type: data.content_type,
            filename: data.filename,
            link_mode: data
                .link_mode
                .as_deref()
                .map_or_else(|| LinkMode::Other(String::new()), LinkMode::parse),
        })
    }

    /// Name to show in logs: the library filename, or `attachment_<key>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("attachment_{}", self.key))
    }
}
