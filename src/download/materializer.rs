//! Listing an entry's file attachments and writing them to disk.

use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::library::{Attachment, LibraryApi, LibraryEntry};

use super::error::MaterializeError;
use super::filename::{DownloadTarget, classify_extension, resolve_unique_name, sanitize_title};

/// Lists the stored-file attachments of `entry_key`.
///
/// Notes, annotations and link-only attachments are dropped. A failed fetch
/// is logged and yields an empty list.
#[instrument(skip(api))]
pub async fn list_attachments(api: &dyn LibraryApi, entry_key: &str) -> Vec<Attachment> {
    let children = match api.list_children(entry_key).await {
        Ok(children) => children,
        Err(e) => {
            warn!(item = entry_key, error = %e, "Error getting attachments for item");
            return Vec::new();
        }
    };

    let total_children = children.len();
    let attachments: Vec<Attachment> = children
        .into_iter()
        .filter_map(Attachment::from_record)
        .filter(|attachment| {
            let keep = attachment.link_mode.is_stored_file();
            if !keep {
                debug!(key = %attachment.key, link_mode = ?attachment.link_mode, "skipping non-stored attachment");
            }
            keep
        })
        .collect();

    debug!(total_children, file_attachments = attachments.len(), "filtered children");
    attachments
}

/// Writes `bytes` to `path`, creating parent directories first.
///
/// The file is created or truncated. A failure part-way leaves whatever was
/// written so far.
///
/// # Errors
///
/// Returns the underlying IO error.
pub async fn write_bytes(bytes: &[u8], path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Downloads one attachment into `target_dir`, named after `entry`'s title.
///
/// The name is resolved against the directory as it is just before the
/// fetch, so files from earlier attachments or earlier runs push the counter
/// suffix up.
///
/// # Errors
///
/// Returns [`MaterializeError`] when the directory cannot be created, the
/// content cannot be fetched, or the file cannot be written.
#[instrument(skip_all, fields(key = %attachment.key, entry = %entry.key))]
pub async fn materialize(
    api: &dyn LibraryApi,
    attachment: &Attachment,
    entry: &LibraryEntry,
    target_dir: &Path,
) -> Result<DownloadTarget, MaterializeError> {
    fs::create_dir_all(target_dir)
        .await
        .map_err(|e| MaterializeError::io(&attachment.key, target_dir, e))?;

    let base = sanitize_title(&entry.title);
    let extension = classify_extension(attachment.content_type.as_deref());
    let target = DownloadTarget {
        dir: target_dir.to_path_buf(),
        file_name: resolve_unique_name(&base, extension, target_dir),
    };
    let path = target.path();
    debug!(path = %path.display(), "resolved output path");

    let content = api
        .fetch_content(&attachment.key)
        .await
        .map_err(|e| MaterializeError::fetch(&attachment.key, e))?;

    write_bytes(&content, &path)
        .await
        .map_err(|e| MaterializeError::io(&attachment.key, &path, e))?;

    info!(
        bytes = content.len(),
        "Downloaded: {} (original: {})",
        target.file_name,
        attachment.display_name()
    );
    Ok(target)
}
