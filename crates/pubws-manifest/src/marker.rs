//! Resolution marker and workspace membership
//!
//! A package opts into workspace-managed resolution by declaring
//! `resolution: workspace` in its own manifest and by being listed in
//! the workspace manifest's `workspace` member list. Marker insertion is
//! idempotent; the membership append is a raw append, so callers check
//! membership first when they need idempotence.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

use pubws_editor::KeyPath;

use crate::errors::ManifestError;
use crate::manifest::{absolute_path, Pubspec};

const RESOLUTION_KEY: &str = "resolution";
const RESOLUTION_VALUE: &str = "workspace";
const ENVIRONMENT_KEY: &str = "environment";
const WORKSPACE_KEY: &str = "workspace";

/// Declare `resolution: workspace` in the local manifest.
///
/// Placed immediately after the `environment` block when one exists,
/// otherwise appended at the end of the document. A no-op returning
/// `false` when the key is already present, wherever it sits.
pub fn ensure_resolution_marker(local: &mut Pubspec) -> Result<bool, ManifestError> {
    let inserted = local.doc_mut().insert_top_level(
        RESOLUTION_KEY,
        Some(RESOLUTION_VALUE),
        Some(ENVIRONMENT_KEY),
    )?;
    if !inserted {
        debug!("resolution marker already present in {:?}", local.path());
    }
    Ok(inserted)
}

/// Current entries of the workspace manifest's member list.
pub fn workspace_members(workspace: &Pubspec) -> Result<Vec<String>, ManifestError> {
    Ok(workspace
        .doc()
        .list_items(&KeyPath::root().key(WORKSPACE_KEY))?
        .unwrap_or_default())
}

/// Append one member path to the workspace manifest's member list,
/// creating the list when absent. No duplicate detection here.
pub fn add_workspace_member(workspace: &mut Pubspec, member: &str) -> Result<(), ManifestError> {
    workspace
        .doc_mut()
        .append(&KeyPath::root().key(WORKSPACE_KEY), member)?;
    Ok(())
}

/// The local package's directory relative to the workspace manifest's
/// directory, in the forward-slash form member lists use.
///
/// When one manifest path is relative and the other absolute, both are
/// normalized to absolute form first; a lexical walk over mixed forms
/// would produce a bogus `..`-chain.
pub fn member_path(workspace: &Pubspec, local: &Pubspec) -> String {
    let (from, to) = if workspace.dir().is_absolute() == local.dir().is_absolute() {
        (workspace.dir().to_path_buf(), local.dir().to_path_buf())
    } else {
        (absolute_path(workspace.dir()), absolute_path(local.dir()))
    };
    let relative = relative_path(&from, &to);
    relative.to_string_lossy().replace('\\', "/")
}

fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let to: Vec<Component<'_>> = to
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for component in &to[common..] {
        out.push(component);
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
