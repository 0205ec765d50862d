//! Workflow variant options.
//!
//! The release workflow has been maintained in three shapes over time:
//! branch push with the prebuilt vcpkg action, manual dispatch with a
//! cached build, and tag push with vcpkg bootstrapped from source. They
//! share one generator; this module holds the knobs that tell them apart
//! together with the version pins written into the job environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};

/// Default name of the generated workflow file.
pub const DEFAULT_OUTPUT: &str = "prebuild.yml";
/// Branch whose pushes publish the prebuilt libraries.
pub const DEFAULT_BRANCH: &str = "upload-prebuilt-static-z3";
/// Tag pattern used by the tag-push trigger when none is given.
pub const DEFAULT_TAG_PATTERN: &str = "*";
/// Z3 release the assets are published under.
pub const DEFAULT_Z3_VERSION: &str = "0.12.2";
/// vcpkg commit pinning the z3 port.
pub const DEFAULT_VCPKG_REVISION: &str = "5c82f7e6372c9b0ea25e1fd829dd50235ef37629";
/// Packaging script invoked once per triplet.
pub const DEFAULT_PACKAGE_SCRIPT: &str = "z3-sys/scripts/make_artifact.sh";

/// What starts the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Trigger {
    /// Push to one of the listed branches.
    Push {
        #[serde(default = "default_branches")]
        branches: Vec<String>,
    },
    /// Push of a tag matching one of the patterns.
    Tag {
        #[serde(default = "default_tag_patterns")]
        patterns: Vec<String>,
    },
    /// Manual run from the Actions UI.
    Dispatch,
}

fn default_branches() -> Vec<String> {
    vec![DEFAULT_BRANCH.to_string()]
}

fn default_tag_patterns() -> Vec<String> {
    vec![DEFAULT_TAG_PATTERN.to_string()]
}

impl Trigger {
    /// Branch push on the default publishing branch.
    pub fn push() -> Self {
        Trigger::Push {
            branches: default_branches(),
        }
    }

    /// Tag push on any tag.
    pub fn tag() -> Self {
        Trigger::Tag {
            patterns: default_tag_patterns(),
        }
    }

    /// Short name, as accepted in manifests and on the command line.
    pub fn kind(&self) -> &'static str {
        match self {
            Trigger::Push { .. } => "push",
            Trigger::Tag { .. } => "tag",
            Trigger::Dispatch => "dispatch",
        }
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::push()
    }
}

/// Where the vcpkg toolchain comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolchainSource {
    /// `johnwason/vcpkg-action`, one action step per triplet.
    #[default]
    Action,
    /// Clone vcpkg at the pinned revision and run its bootstrap script.
    Bootstrap,
}

/// Everything that varies between generated workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WorkflowConfig {
    /// Workflow display name.
    pub name: String,
    /// Output path, relative to the project directory.
    pub output: PathBuf,
    pub trigger: Trigger,
    /// Reuse vcpkg binary caches between runs.
    pub cache: bool,
    pub toolchain: ToolchainSource,
    pub z3_version: String,
    pub vcpkg_revision: String,
    /// Runner label for the release job.
    pub runner: String,
    /// Packaging script path, relative to the workspace checkout.
    pub package_script: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            name: "Upload prebuilt Z3".into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            trigger: Trigger::default(),
            cache: false,
            toolchain: ToolchainSource::default(),
            z3_version: DEFAULT_Z3_VERSION.into(),
            vcpkg_revision: DEFAULT_VCPKG_REVISION.into(),
            runner: "ubuntu-latest".into(),
            package_script: DEFAULT_PACKAGE_SCRIPT.into(),
        }
    }
}

impl WorkflowConfig {
    /// Check for values that would produce a broken workflow.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        for (field, value) in [
            ("name", &self.name),
            ("z3-version", &self.z3_version),
            ("vcpkg-revision", &self.vcpkg_revision),
            ("runner", &self.runner),
            ("package-script", &self.package_script),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{field} is empty"));
            }
        }

        if self.vcpkg_revision.chars().any(char::is_whitespace) {
            problems.push(format!(
                "vcpkg-revision '{}' contains whitespace",
                self.vcpkg_revision
            ));
        }
        if self.output.as_os_str().is_empty() {
            problems.push("output path is empty".into());
        }

        match &self.trigger {
            Trigger::Push { branches } if branches.is_empty() => {
                problems.push("push trigger has no branches".into())
            }
            Trigger::Tag { patterns } if patterns.is_empty() => {
                problems.push("tag trigger has no patterns".into())
            }
            _ => {}
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::InvalidConfig {
                detail: problems.join("; "),
            })
        }
    }
}
