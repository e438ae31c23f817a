//! Candidate file discovery
//!
//! Walks the configured root with walkdir and keeps regular files whose
//! extension matches. The root itself must be a readable directory; entries
//! below it that cannot be read are logged and skipped.

use crate::config::ScanConfig;
use crate::error::TraversalError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Find all candidate track files under `config.root`
///
/// Returned paths are absolute and sorted, so discovery order is stable
/// between runs over the same tree.
pub fn discover(config: &ScanConfig) -> Result<Vec<PathBuf>, TraversalError> {
    let root = std::path::absolute(&config.root).map_err(|e| TraversalError::WalkFailed {
        path: config.root.clone(),
        reason: e.to_string(),
    })?;

    if !root.exists() {
        return Err(TraversalError::NotFound { path: root });
    }

    if !root.is_dir() {
        return Err(TraversalError::NotADirectory { path: root });
    }

    info!(root = %root.display(), extension = %config.extension, "Discovering track files");

    let mut walker = WalkDir::new(&root);
    if let Some(depth) = config.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    let mut excluded = 0u64;

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(TraversalError::WalkFailed {
                    path: root,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!("Error walking directory: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), &config.extension) {
            continue;
        }

        if config.is_excluded(&entry.path().to_string_lossy()) {
            excluded += 1;
            debug!(path = %entry.path().display(), "Excluded");
            continue;
        }

        files.push(entry.into_path());
    }

    files.sort();

    info!(files = files.len(), excluded = excluded, "Discovery complete");
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
