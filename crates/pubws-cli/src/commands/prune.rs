//! The `prune` command: drop dependencies the sources never import

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use pubws_manifest::{prune_unused, referenced_packages, Pubspec};

#[derive(Args, Debug)]
pub struct PruneCommand {
    /// Path to the pubspec.yaml to clean up
    pub manifest: PathBuf,
}

pub fn handle_prune(cmd: &PruneCommand) -> Result<()> {
    let mut manifest = Pubspec::load(&cmd.manifest)
        .with_context(|| format!("failed to load {}", cmd.manifest.display()))?;
    let referenced = referenced_packages(manifest.dir())?;
    let actions = prune_unused(&mut manifest, &referenced)?;
    manifest.save()?;

    for action in &actions {
        println!(
            "  {} removed {}/{}{}",
            "-".red().bold(),
            action.section.key(),
            action.name,
            if action.section_removed {
                " (section now empty, dropped)"
            } else {
                ""
            }
        );
    }
    println!(
        "{} pruned {} unused dependenc{}",
        "ok:".green().bold(),
        actions.len(),
        if actions.len() == 1 { "y" } else { "ies" }
    );
    Ok(())
}
