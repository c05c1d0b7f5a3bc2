//! Package manifest discovery
//!
//! Walks a directory tree and yields every `pubspec.yaml` in it, in a
//! deterministic order, skipping hidden directories (which covers
//! `.dart_tool`, `.git`, and friends). The workspace's own manifest is
//! excluded so a migration never merges the workspace into itself.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::errors::ManifestError;
use crate::manifest::{absolute_path, MANIFEST_FILE};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Find every package manifest under `root`, excluding `exclude` (the
/// workspace manifest) when given.
///
/// Both sides of the exclusion check are normalized to absolute paths,
/// so a workspace manifest supplied in a different spelling than the
/// walk produces (relative vs absolute, `..` segments) is still skipped.
pub fn discover_manifests(
    root: &Path,
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>, ManifestError> {
    let exclude = exclude.map(absolute_path);
    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));
    for entry in walker {
        let entry = entry.map_err(|e| ManifestError::Io(io::Error::from(e)))?;
        if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE {
            continue;
        }
        if exclude
            .as_deref()
            .is_some_and(|x| absolute_path(entry.path()) == x)
        {
            continue;
        }
        found.push(entry.into_path());
    }
    debug!("discovered {} manifest(s) under {:?}", found.len(), root);
    Ok(found)
}
