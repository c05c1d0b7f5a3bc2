//! The `pin` command: bulk wildcard rewrite

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use pubws_manifest::{pin_all, Pubspec};

#[derive(Args, Debug)]
pub struct PinCommand {
    /// Path to the pubspec.yaml to rewrite
    pub manifest: PathBuf,
}

pub fn handle_pin(cmd: &PinCommand) -> Result<()> {
    let mut manifest = Pubspec::load(&cmd.manifest)
        .with_context(|| format!("failed to load {}", cmd.manifest.display()))?;
    let changed = pin_all(&mut manifest)?;
    manifest.save()?;
    println!(
        "{} pinned {} constraint(s) to 'any'",
        "ok:".green().bold(),
        changed
    );
    Ok(())
}
