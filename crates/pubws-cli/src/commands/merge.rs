//! The `merge` command: move one package into workspace resolution

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use pubws_manifest::{
    add_workspace_member, ensure_resolution_marker, member_path, merge_manifests,
    workspace_members, MergeOutcome, Pubspec,
};

#[derive(Args, Debug)]
pub struct MergeCommand {
    /// Path to the package's pubspec.yaml
    #[arg(long)]
    pub local: PathBuf,

    /// Path to the workspace pubspec.yaml
    #[arg(long)]
    pub workspace: PathBuf,
}

/// Merge one package into the workspace and flush both manifests.
pub fn handle_merge(cmd: &MergeCommand) -> Result<()> {
    let mut local = Pubspec::load(&cmd.local)
        .with_context(|| format!("failed to load {}", cmd.local.display()))?;
    let mut workspace = Pubspec::load(&cmd.workspace)
        .with_context(|| format!("failed to load {}", cmd.workspace.display()))?;

    let outcome = merge_package(&mut local, &mut workspace)?;

    // Nothing is written unless every section merged cleanly.
    local.save()?;
    workspace.save()?;

    report(&local, &outcome);
    Ok(())
}

/// Stage the full single-package flow in memory: three-section merge,
/// resolution marker, and workspace membership.
pub fn merge_package(local: &mut Pubspec, workspace: &mut Pubspec) -> Result<MergeOutcome> {
    let outcome = merge_manifests(local, workspace)?;
    ensure_resolution_marker(local)?;

    let member = member_path(workspace, local);
    if workspace_members(workspace)?.iter().any(|m| *m == member) {
        debug!("'{}' already a workspace member", member);
    } else {
        add_workspace_member(workspace, &member)?;
    }
    Ok(outcome)
}

fn report(local: &Pubspec, outcome: &MergeOutcome) {
    let package = local.name().unwrap_or("package");
    for notice in &outcome.promoted {
        println!("  {} {notice}", "+".green().bold());
    }
    println!(
        "{} merged '{}' into the workspace ({} propagated, {} deferred)",
        "ok:".green().bold(),
        package,
        outcome.promoted.len(),
        outcome.deferred
    );
}
