//! z3-prebuild — generate the workflow that publishes prebuilt static Z3 libraries.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::generate::WorkflowArgs;
use manifest::PrebuildManifest;

#[derive(Parser)]
#[command(name = "z3-prebuild", version, about = "Prebuilt Z3 release workflow generator")]
struct Cli {
    /// Log progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the release workflow file
    Generate {
        #[command(flatten)]
        args: WorkflowArgs,
    },
    /// Check that the workflow file matches what generate would write
    Check {
        #[command(flatten)]
        args: WorkflowArgs,
    },
    /// Create a prebuild.toml
    Init {
        /// Directory to create it in (default: current directory)
        dir: Option<PathBuf>,
    },
    /// Inspect the platform table
    Targets {
        #[command(subcommand)]
        action: TargetsAction,
    },
}

#[derive(Subcommand)]
enum TargetsAction {
    /// List the platforms that will be built
    List {
        /// Print the table as a platforms file
        #[arg(long)]
        toml: bool,
    },
    /// Show one platform in detail
    Describe {
        /// vcpkg triplet
        triplet: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Generate { args } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::generate::run(&project_dir, manifest.as_ref(), &args)
        }

        Commands::Check { args } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::check::run(&project_dir, manifest.as_ref(), &args)
        }

        Commands::Init { dir } => {
            let dir = dir.map_or_else(|| cwd.clone(), |d| cwd.join(d));
            commands::init::run(&dir)
        }

        Commands::Targets { action } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            let manifest = manifest.unwrap_or_default();
            let platforms = manifest.resolve_platforms(&project_dir)?;
            match action {
                TargetsAction::List { toml } => commands::targets::list(&platforms, toml),
                TargetsAction::Describe { triplet } => {
                    commands::targets::describe(&platforms, &manifest.workflow, &triplet)
                }
            }
        }
    }
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<PrebuildManifest>, Option<PathBuf>)> {
    match PrebuildManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
