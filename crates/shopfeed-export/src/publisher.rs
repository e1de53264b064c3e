//! Promotion of a completed working file to the published path.

use std::fs;
use std::path::Path;

use crate::error::ExportError;

/// Replaces the published export with the completed working file.
///
/// `fs::rename` is atomic when both paths live on the same filesystem, so
/// a concurrent reader observes either the old export or the new one in
/// full. When the paths span filesystems the rename fails and a plain copy
/// (which preserves permission bits) is used instead; that fallback can
/// race a reader.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if neither rename nor copy succeeds. The
/// previously published file is left untouched in that case.
pub fn publish(working: &Path, published: &Path) -> Result<(), ExportError> {
    if fs::rename(working, published).is_ok() {
        return Ok(());
    }

    fs::copy(working, published).map_err(|e| ExportError::Io {
        path: published.to_path_buf(),
        source: e,
    })?;

    if let Err(e) = fs::remove_file(working) {
        tracing::warn!(
            path = %working.display(),
            error = %e,
            "failed to remove working file after copy promotion"
        );
    }
    Ok(())
}
