//! Recency selection over the library's newest-first item feed.
//!
//! The feed is a single bounded page sorted by `dateAdded` descending. The scan
//! stops at the first item older than the cutoff, which is only correct because
//! of that ordering. Items past the page size are never seen: a window holding
//! more entries than one page silently loses the oldest of them.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::library::{ItemRecord, LibraryApi, LibraryEntry, LibraryError};

/// Result of scanning one feed page.
#[derive(Debug, Default)]
pub struct RecentScan {
    /// Top-level entries inside the window, newest first, each key once.
    pub entries: Vec<LibraryEntry>,
    /// Items pulled from the feed, including the one that ended the scan.
    pub inspected: usize,
    /// Items skipped because `dateAdded` could not be parsed.
    pub unparseable: usize,
}

/// Result of [`select_recent`].
#[derive(Debug, Default)]
pub struct RecentSelection {
    pub entries: Vec<LibraryEntry>,
    /// Set when the feed itself could not be fetched. `entries` is then empty,
    /// which callers that only look at `entries` cannot tell apart from an
    /// empty window.
    pub fetch_error: Option<LibraryError>,
}

/// Parses a library `dateAdded` value (`2024-01-15T10:30:00Z`).
///
/// # Errors
///
/// Returns the chrono parse error for anything that is not RFC 3339.
pub fn parse_date_added(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value.trim()).map(|dt| dt.with_timezone(&Utc))
}

/// Scans `items` (newest first) and keeps top-level entries added at or after
/// `cutoff`.
///
/// Pulling stops at the first item older than `cutoff`; later items are not
/// consumed from the iterator.
pub fn scan_recent<I>(items: I, cutoff: DateTime<Utc>) -> RecentScan
where
    I: IntoIterator<Item = ItemRecord>,
{
    let mut scan = RecentScan::default();
    let mut seen_keys: HashSet<String> = HashSet::new();

    for record in items {
        scan.inspected += 1;

        let Some(raw_date) = record.data.date_added.as_deref() else {
            debug!(key = %record.key, "item has no dateAdded, skipping");
            continue;
        };
        let date_added = match parse_date_added(raw_date) {
            Ok(date) => date,
            Err(e) => {
                warn!(key = %record.key, date_added = raw_date, error = %e, "Could not parse date");
                scan.unparseable += 1;
                continue;
            }
        };

        if date_added < cutoff {
            debug!(key = %record.key, %date_added, "reached items older than cutoff");
            break;
        }

        let entry = LibraryEntry::from(record);
        if !entry.is_top_level() {
            debug!(key = %entry.key, "child item in feed, skipping");
            continue;
        }
        if seen_keys.insert(entry.key.clone()) {
            scan.entries.push(entry);
        }
    }

    scan
}

/// Selects entries added within `lookback` of now.
pub async fn select_recent(
    api: &dyn LibraryApi,
    lookback: TimeDelta,
    page_size: u32,
) -> RecentSelection {
    let cutoff = Utc::now() - lookback;
    select_recent_at(api, cutoff, page_size).await
}

/// Selects entries added at or after `cutoff`.
///
/// A failed feed fetch is logged and reported through
/// [`RecentSelection::fetch_error`]; it never propagates.
#[tracing::instrument(skip(api))]
pub async fn select_recent_at(
    api: &dyn LibraryApi,
    cutoff: DateTime<Utc>,
    page_size: u32,
) -> RecentSelection {
    let items = match api.list_items(page_size).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Error fetching items");
            return RecentSelection {
                entries: Vec::new(),
                fetch_error: Some(e),
            };
        }
    };

    let fetched = items.len();
    let scan = scan_recent(items, cutoff);
    info!(
        fetched,
        inspected = scan.inspected,
        selected = scan.entries.len(),
        unparseable = scan.unparseable,
        "Scanned recent items"
    );
    if fetched == usize::try_from(page_size).unwrap_or(usize::MAX) && scan.inspected == fetched {
        warn!(
            page_size,
            "Every item on the page is inside the window; older entries beyond the page were not checked"
        );
    }

    RecentSelection {
        entries: scan.entries,
        fetch_error: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::library::ItemData;

    fn record(key: &str, date_added: Option<&str>, parent: Option<&str>) -> ItemRecord {
        ItemRecord {
            key: key.to_string(),
            data: ItemData {
                title: Some(format!("Title {key}")),
                date_added: date_added.map(str::to_string),
                parent_item: parent.map(str::to_string),
                ..ItemData::default()
            },
        }
    }

    fn cutoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_scan_stops_at_first_item_older_than_cutoff() {
        let feed = vec![
            record("T0", Some("2024-03-12T09:00:00Z"), None),
            record("T1", Some("2024-03-11T09:00:00Z"), None),
            record("T2", Some("2024-03-09T09:00:00Z"), None),
            record("T3", Some("2024-03-08T09:00:00Z"), None),
        ];
        let pulled = Cell::new(0usize);
        let scan = scan_recent(feed.into_iter().inspect(|_| pulled.set(pulled.get() + 1)), cutoff());

        let keys: Vec<&str> = scan.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["T0", "T1"]);
        assert_eq!(pulled.get(), 3, "T3 must never be pulled from the feed");
        assert_eq!(scan.inspected, 3);
    }

    #[test]
    fn test_scan_includes_item_exactly_at_cutoff() {
        let feed = vec![record("EDGE", Some("2024-03-10T00:00:00Z"), None)];
        let scan = scan_recent(feed, cutoff());
        assert_eq!(scan.entries.len(), 1);
    }

    #[test]
    fn test_scan_excludes_child_items_inside_window() {
        let feed = vec![
            record("PARENT", Some("2024-03-12T09:00:00Z"), None),
            record("CHILD", Some("2024-03-12T09:00:01Z"), Some("PARENT")),
        ];
        let scan = scan_recent(feed, cutoff());
        let keys: Vec<&str> = scan.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["PARENT"]);
    }

    #[test]
    fn test_scan_empty_parent_reference_counts_as_top_level() {
        let feed = vec![record("K", Some("2024-03-12T09:00:00Z"), Some(""))];
        let scan = scan_recent(feed, cutoff());
        assert_eq!(scan.entries.len(), 1);
    }

    #[test]
    fn test_scan_deduplicates_by_key() {
        let feed = vec![
            record("SAME", Some("2024-03-12T09:00:00Z"), None),
            record("SAME", Some("2024-03-11T09:00:00Z"), None),
        ];
        let scan = scan_recent(feed, cutoff());
        assert_eq!(scan.entries.len(), 1);
        assert_eq!(scan.inspected, 2);
    }

    #[test]
    fn test_scan_skips_unparseable_and_missing_dates_without_stopping() {
        let feed = vec![
            record("BAD", Some("yesterday-ish"), None),
            record("NONE", None, None),
            record("GOOD", Some("2024-03-12T09:00:00Z"), None),
        ];
        let scan = scan_recent(feed, cutoff());
        let keys: Vec<&str> = scan.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["GOOD"]);
        assert_eq!(scan.unparseable, 1);
        assert_eq!(scan.inspected, 3);
    }

    #[test]
    fn test_parse_date_added_accepts_offsets() {
        let parsed = parse_date_added("2024-03-10T02:00:00+02:00").unwrap();
        assert_eq!(parsed, cutoff());
    }

    struct FeedOnly(Result<Vec<ItemRecord>, u16>);

    #[async_trait]
    impl LibraryApi for FeedOnly {
        async fn list_items(&self, _page_size: u32) -> Result<Vec<ItemRecord>, LibraryError> {
            match &self.0 {
                Ok(items) => Ok(items.clone()),
                Err(status) => Err(LibraryError::status("http://mock/items", *status)),
            }
        }

        async fn list_children(&self, _entry_key: &str) -> Result<Vec<ItemRecord>, LibraryError> {
            Ok(Vec::new())
        }

        async fn fetch_content(&self, _attachment_key: &str) -> Result<Vec<u8>, LibraryError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_select_recent_at_fetch_failure_yields_empty_with_error() {
        let api = FeedOnly(Err(403));
        let selection = select_recent_at(&api, cutoff(), 100).await;
        assert!(selection.entries.is_empty());
        assert!(selection.fetch_error.is_some_and(|e| e.is_auth()));
    }

    #[tokio::test]
    async fn test_select_recent_uses_lookback_from_now() {
        let recent = (Utc::now() - TimeDelta::hours(1)).to_rfc3339();
        let old = (Utc::now() - TimeDelta::days(30)).to_rfc3339();
        let api = FeedOnly(Ok(vec![
            record("NEW", Some(&recent), None),
            record("OLD", Some(&old), None),
        ]));
        let selection = select_recent(&api, TimeDelta::days(7), 100).await;
        assert!(selection.fetch_error.is_none());
        let keys: Vec<&str> = selection.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["NEW"]);
    }
}
