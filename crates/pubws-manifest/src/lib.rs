//! Workspace dependency reconciliation for pubspec manifests
//!
//! This crate implements the merge-and-rewrite flow that moves a package
//! into workspace-managed resolution: conflict detection between a local
//! manifest and the shared workspace manifest, propagation of locally
//! declared dependencies into the workspace, rewriting local constraints
//! to the `any` wildcard, and the supporting collaborators (manifest
//! discovery, unused-dependency pruning, bulk pinning).
//!
//! All document mutation goes through `pubws-editor`, so human-authored
//! formatting and comments survive every rewrite.

pub mod discovery;
pub mod errors;
pub mod manifest;
pub mod marker;
pub mod merge;
pub mod pin;
pub mod unused;

pub use discovery::discover_manifests;
pub use errors::{Conflict, ManifestError};
pub use manifest::{Pubspec, MANIFEST_FILE};
pub use marker::{
    add_workspace_member, ensure_resolution_marker, member_path, workspace_members,
};
pub use merge::{
    merge_manifests, merge_section, DependencySection, MergeNotice, MergeOutcome, WILDCARD,
};
pub use pin::pin_all;
pub use unused::{prune_unused, referenced_packages, PruneAction};
