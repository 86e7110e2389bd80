use std::fs;
use std::path::Path;

use crate::error::Result;

/// Checks whether the breaking change doc is accessible.
///
/// Any error, not found or permission denied alike, counts as "does not exist".
pub fn doc_exists(path: &Path) -> bool {
    tracing::debug!("Checking if file exists: {}", path.display());
    fs::metadata(path).is_ok()
}

/// Reads the content to publish. Unlike the existence check, failure here aborts the run.
pub fn read_content(path: &Path) -> Result<String> {
    tracing::debug!("Reading from file: {}", path.display());
    fs::read_to_string(path).map_err(|e| {
        tracing::error!("Cannot read {}: {}", path.display(), e);
        e.into()
    })
}
