//! `prebuild.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use prebuild_targets::parse::load_platforms_toml;
use prebuild_targets::{builtin_platforms, PlatformSpec};
use prebuild_workflow::WorkflowConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File name searched for when locating a project.
pub const MANIFEST_FILE: &str = "prebuild.toml";

/// The top-level manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrebuildManifest {
    /// Workflow variant and version pins.
    #[serde(default)]
    pub workflow: WorkflowConfig,
    /// Inline platform table. Takes the place of the built-in table.
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
    /// Standalone platform table, relative to the manifest directory.
    #[serde(default)]
    pub platforms_file: Option<PathBuf>,
}

impl PrebuildManifest {
    /// Search upward from `start_dir` for a `prebuild.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: PrebuildManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                debug!(path = %candidate.display(), "loaded manifest");
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing prebuild.toml")
    }

    /// The platform table this project builds, in build order.
    ///
    /// Inline `[[platforms]]` entries win, then `platforms-file`, then the
    /// built-in table. Setting both inline entries and a file is an error.
    pub fn resolve_platforms(&self, project_dir: &Path) -> Result<Vec<PlatformSpec>> {
        match (&self.platforms_file, self.platforms.is_empty()) {
            (Some(_), false) => {
                bail!("{MANIFEST_FILE} sets both [[platforms]] and platforms-file; keep one")
            }
            (Some(file), true) => {
                let path = project_dir.join(file);
                load_platforms_toml(&path)
                    .with_context(|| format!("loading platforms from {}", path.display()))
            }
            (None, false) => Ok(self.platforms.clone()),
            (None, true) => Ok(builtin_platforms()),
        }
    }

    /// Generate the default template for `z3-prebuild init`.
    pub fn template() -> String {
        let defaults = WorkflowConfig::default();
        format!(
            r#"[workflow]
name = "{name}"
output = "{output}"
z3-version = "{z3}"
vcpkg-revision = "{revision}"
cache = false
toolchain = "action"

[workflow.trigger]
kind = "push"
branches = ["{branch}"]

# Leave out to build the built-in table (x64-linux, x64-osx, x64-windows-static-md).
# [[platforms]]
# runner-label = "ubuntu-latest"
# triplet = "x64-linux"
# library-file-name = "libz3.a"
"#,
            name = defaults.name,
            output = defaults.output.display(),
            z3 = defaults.z3_version,
            revision = defaults.vcpkg_revision,
            branch = prebuild_workflow::config::DEFAULT_BRANCH,
        )
    }
}
