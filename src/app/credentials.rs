use anyhow::{Result, bail};

/// Where to create a key with library read access.
pub(crate) const API_KEYS_URL: &str = "https://www.zotero.org/settings/keys";

/// Library ID and API key, both non-empty.
#[derive(Clone)]
pub(crate) struct Credentials {
    pub library_id: String,
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("library_id", &self.library_id)
            .finish_non_exhaustive()
    }
}

/// Fails with setup guidance unless both values are present.
pub(crate) fn require_credentials(
    library_id: Option<&str>,
    api_key: Option<&str>,
) -> Result<Credentials> {
    let library_id = library_id.map(str::trim).filter(|v| !v.is_empty());
    let api_key = api_key.map(str::trim).filter(|v| !v.is_empty());

    match (library_id, api_key) {
        (Some(library_id), Some(api_key)) => Ok(Credentials {
            library_id: library_id.to_string(),
            api_key: api_key.to_string(),
        }),
        (library_id, api_key) => {
            let mut missing = Vec::new();
            if library_id.is_none() {
                missing.push("ZOTERO_LIBRARY_ID");
            }
            if api_key.is_none() {
                missing.push("ZOTERO_API_KEY");
            }
            bail!(
                "Missing Zotero credentials: {}\n  \
                 Set them in the environment or a .env file, or pass --library-id / --api-key.\n  \
                 Create an API key at {API_KEYS_URL}",
                missing.join(", ")
            );
        }
    }
}
