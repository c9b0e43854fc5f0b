use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ImprepError, Result};

/// Folder holding the images of one category: `root/<index>`.
pub fn category_dir(root: &Path, index: usize) -> PathBuf {
    root.join(index.to_string())
}

/// List image files directly inside `dir`.
///
/// Keeps regular, non-hidden files whose name contains one of `extensions`
/// (case-sensitive). Results are sorted by file name so scans are
/// reproducible. A missing folder or one with no matching files is
/// reported as not found.
pub fn list_image_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ImprepError::NotFound(format!(
            "category folder {} could not be listed: {e}",
            dir.display()
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type()?.is_dir() {
            continue;
        }
        if !extensions.iter().any(|ext| name.contains(ext.as_str())) {
            debug!(file = name, "skipping file with unsupported extension");
            continue;
        }
        files.push(entry.path());
    }

    if files.is_empty() {
        return Err(ImprepError::NotFound(format!(
            "category folder {} contains no images",
            dir.display()
        )));
    }

    files.sort();
    Ok(files)
}
