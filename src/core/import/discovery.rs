//! Export file discovery

use crate::domain::{DocseedError, Result};
use std::path::{Path, PathBuf};

/// List the export files in `source_dir`
///
/// Keeps regular files (symlinks are followed) whose extension matches one of
/// `extensions`, ignoring ASCII case. The result is sorted by file name.
///
/// # Errors
///
/// Returns [`DocseedError::Discovery`] if the directory cannot be listed.
pub async fn discover_export_files(
    source_dir: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(source_dir).await.map_err(|e| {
        DocseedError::Discovery(format!(
            "Failed to list source directory {}: {}",
            source_dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    loop {
        let entry = entries.next_entry().await.map_err(|e| {
            DocseedError::Discovery(format!(
                "Failed to read entry in {}: {}",
                source_dir.display(),
                e
            ))
        })?;
        let Some(entry) = entry else {
            break;
        };

        let path = entry.path();
        if !has_extension(&path, extensions) {
            tracing::debug!(path = %path.display(), "Skipping file with unrecognised extension");
            continue;
        }

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => files.push(path),
            Ok(_) => {
                tracing::debug!(path = %path.display(), "Skipping non-file entry");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::info!(
        source_dir = %source_dir.display(),
        files = files.len(),
        "Discovered export files"
    );

    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
