//! `z3-prebuild generate` — write the release workflow.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use prebuild_targets::PlatformSpec;
use prebuild_workflow::{generate, write_workflow, ToolchainSource, Trigger, WorkflowConfig};
use tracing::debug;

use crate::manifest::PrebuildManifest;

/// Output path meaning "write to stdout".
pub const STDOUT: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TriggerArg {
    Push,
    Tag,
    Dispatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToolchainArg {
    Action,
    Bootstrap,
}

impl From<ToolchainArg> for ToolchainSource {
    fn from(arg: ToolchainArg) -> Self {
        match arg {
            ToolchainArg::Action => ToolchainSource::Action,
            ToolchainArg::Bootstrap => ToolchainSource::Bootstrap,
        }
    }
}

/// Flags that override `prebuild.toml`, shared by `generate` and `check`.
#[derive(Debug, Clone, Default, Args)]
pub struct WorkflowArgs {
    /// What starts the workflow
    #[arg(long, value_enum)]
    pub trigger: Option<TriggerArg>,
    /// Branch for the push trigger (repeatable)
    #[arg(long = "branch", conflicts_with = "tags")]
    pub branches: Vec<String>,
    /// Tag pattern for the tag trigger (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Cache vcpkg binaries between runs
    #[arg(long, conflicts_with = "no_cache")]
    pub cache: bool,
    /// Build from scratch on every run
    #[arg(long)]
    pub no_cache: bool,
    /// Where vcpkg comes from
    #[arg(long, value_enum)]
    pub toolchain: Option<ToolchainArg>,
    /// Output file, relative to the project directory ("-" for stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Z3 release version
    #[arg(long)]
    pub z3_version: Option<String>,
    /// vcpkg commit to build from
    #[arg(long)]
    pub vcpkg_revision: Option<String>,
    /// Platform table file, instead of the manifest's or the built-in one
    #[arg(long)]
    pub platforms: Option<PathBuf>,
}

impl WorkflowArgs {
    /// Apply command-line overrides on top of the manifest's config.
    /// `--branch` only goes with the push trigger and `--tag` only with the
    /// tag trigger.
    pub fn apply(&self, config: &mut WorkflowConfig) -> Result<()> {
        match self.trigger {
            Some(TriggerArg::Push) if !self.tags.is_empty() => {
                bail!("--tag requires --trigger tag, not push")
            }
            Some(TriggerArg::Tag) if !self.branches.is_empty() => {
                bail!("--branch requires --trigger push, not tag")
            }
            Some(TriggerArg::Dispatch) if !self.branches.is_empty() || !self.tags.is_empty() => {
                bail!("--trigger dispatch takes no --branch or --tag")
            }
            _ => {}
        }

        let trigger = match self.trigger {
            Some(TriggerArg::Push) => Some(self.push_trigger()),
            Some(TriggerArg::Tag) => Some(self.tag_trigger()),
            Some(TriggerArg::Dispatch) => Some(Trigger::Dispatch),
            None if !self.branches.is_empty() => Some(self.push_trigger()),
            None if !self.tags.is_empty() => Some(self.tag_trigger()),
            None => None,
        };
        if let Some(trigger) = trigger {
            config.trigger = trigger;
        }
        if self.cache {
            config.cache = true;
        }
        if self.no_cache {
            config.cache = false;
        }
        if let Some(toolchain) = self.toolchain {
            config.toolchain = toolchain.into();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(version) = &self.z3_version {
            config.z3_version = version.clone();
        }
        if let Some(revision) = &self.vcpkg_revision {
            config.vcpkg_revision = revision.clone();
        }
        Ok(())
    }

    fn push_trigger(&self) -> Trigger {
        if self.branches.is_empty() {
            Trigger::push()
        } else {
            Trigger::Push {
                branches: self.branches.clone(),
            }
        }
    }

    fn tag_trigger(&self) -> Trigger {
        if self.tags.is_empty() {
            Trigger::tag()
        } else {
            Trigger::Tag {
                patterns: self.tags.clone(),
            }
        }
    }
}

/// Merge manifest and flags into the config and platform table to use.
pub fn resolve(
    project_dir: &Path,
    manifest: Option<&PrebuildManifest>,
    args: &WorkflowArgs,
) -> Result<(WorkflowConfig, Vec<PlatformSpec>)> {
    let default_manifest = PrebuildManifest::default();
    let manifest = manifest.unwrap_or(&default_manifest);

    let mut config = manifest.workflow.clone();
    args.apply(&mut config)?;

    let platforms = match &args.platforms {
        Some(path) => prebuild_targets::parse::load_platforms_toml(path)
            .with_context(|| format!("loading platforms from {}", path.display()))?,
        None => manifest.resolve_platforms(project_dir)?,
    };
    debug!(?config, platforms = platforms.len(), "resolved workflow settings");
    Ok((config, platforms))
}

/// Generate the workflow and write it to the configured output.
pub fn run(project_dir: &Path, manifest: Option<&PrebuildManifest>, args: &WorkflowArgs) -> Result<()> {
    let (config, platforms) = resolve(project_dir, manifest, args)?;
    let doc = generate(&config, &platforms).context("generating workflow")?;

    if config.output.as_os_str() == STDOUT {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(doc.render().as_bytes())
            .context("writing workflow to stdout")?;
        return Ok(());
    }

    let path = project_dir.join(&config.output);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    write_workflow(&path, &doc)?;
    println!("Wrote {} ({} platforms)", path.display(), platforms.len());
    Ok(())
}
