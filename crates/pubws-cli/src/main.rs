use clap::{Parser, Subcommand};
use colored::Colorize;

use pubws::commands::{merge, migrate, pin, prune};
use pubws::common;
use pubws::GlobalOpts;
use pubws_manifest::ManifestError;

#[derive(Parser)]
#[command(name = "pubws")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Workspace dependency reconciliation for pubspec manifests",
    long_about = "pubws moves packages into workspace-managed dependency resolution: \
                  it merges per-package constraints into the shared workspace manifest, \
                  rewrites local constraints to 'any', and keeps every edit \
                  format-preserving."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge one package's dependencies into the workspace manifest
    Merge(merge::MergeCommand),
    /// Discover packages under a root and merge them all
    Migrate(migrate::MigrateCommand),
    /// Rewrite every version constraint in a manifest to 'any'
    Pin(pin::PinCommand),
    /// Remove dependencies the package's sources never import
    Prune(prune::PruneCommand),
}

fn main() {
    let cli = Cli::parse();
    common::init_tracing(cli.global.verbosity_level());

    let result = match cli.command {
        Commands::Merge(cmd) => merge::handle_merge(&cmd),
        Commands::Migrate(cmd) => migrate::handle_migrate(&cmd),
        Commands::Pin(cmd) => pin::handle_pin(&cmd),
        Commands::Prune(cmd) => prune::handle_prune(&cmd),
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(exit_code(&err));
    }
}

/// Map a failure to its exit status in one place: 3 for dependency
/// conflicts, 1 for everything else. Malformed arguments exit with 2
/// via clap before we get here.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ManifestError>() {
        Some(ManifestError::Conflicts(_)) => 3,
        _ => 1,
    }
}
