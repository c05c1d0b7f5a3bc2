//! The `migrate` command: discovery-driven workspace migration

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use pubws_manifest::{discover_manifests, Pubspec};

use super::merge::merge_package;

#[derive(Args, Debug)]
pub struct MigrateCommand {
    /// Root directory to search for package manifests
    pub root: PathBuf,

    /// Path to the workspace pubspec.yaml
    #[arg(long)]
    pub workspace: PathBuf,
}

/// Merge every package found under `root` into the workspace.
///
/// All edits are staged first; nothing is written unless every package
/// merged without conflicts.
pub fn handle_migrate(cmd: &MigrateCommand) -> Result<()> {
    let mut workspace = Pubspec::load(&cmd.workspace)
        .with_context(|| format!("failed to load {}", cmd.workspace.display()))?;

    let manifests = discover_manifests(&cmd.root, Some(&cmd.workspace))?;
    info!("migrating {} package(s)", manifests.len());

    let mut merged = Vec::new();
    for path in manifests {
        let mut local =
            Pubspec::load(&path).with_context(|| format!("failed to load {}", path.display()))?;
        let outcome = merge_package(&mut local, &mut workspace)
            .with_context(|| format!("while merging {}", path.display()))?;
        merged.push((local, outcome));
    }

    for (local, _) in &merged {
        local.save()?;
    }
    workspace.save()?;

    let propagated: usize = merged.iter().map(|(_, o)| o.promoted.len()).sum();
    println!(
        "{} migrated {} package(s) ({} dependencies propagated)",
        "ok:".green().bold(),
        merged.len(),
        propagated
    );
    Ok(())
}
