//! User-Agent string for library API traffic.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/zotero-recent";

/// Default User-Agent for library requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("zotero-recent/{version} (research-tool; +{PROJECT_UA_URL})")
}
