//! The generator routine.

use std::path::Path;

use prebuild_targets::parse::ensure_valid;
use prebuild_targets::PlatformSpec;
use tracing::{debug, info, warn};

use crate::config::WorkflowConfig;
use crate::document::{Phase, WorkflowDocument};
use crate::emit::{render_sequence_item, to_lines};
use crate::error::{Result, WorkflowError};
use crate::steps;

/// Column of the `-` in front of each job step.
pub const STEP_INDENT: usize = 6;

/// Build the workflow document for `platforms` under `config`.
///
/// Fragments are appended preamble first, then one build step per
/// platform, the packaging step, and one upload step per platform, all in
/// the order `platforms` lists them.
pub fn generate(config: &WorkflowConfig, platforms: &[PlatformSpec]) -> Result<WorkflowDocument> {
    config.validate()?;
    for issue in ensure_valid(platforms)? {
        warn!("{}", issue.message);
    }

    let mut doc = WorkflowDocument::new();
    doc.push_fragment(Phase::Preamble, None, to_lines(&steps::preamble(config)));

    for platform in platforms {
        debug!(triplet = %platform.triplet, "build step");
        doc.push_fragment(
            Phase::Build,
            Some(platform.triplet.as_str()),
            step_lines(&steps::build_step(platform, config)),
        );
    }

    let mut package = step_lines(&steps::package_step(platforms, config));
    let invocations = package.split_off(package.len() - platforms.len());
    doc.push_fragment(Phase::Package, None, package);
    for (platform, line) in platforms.iter().zip(invocations) {
        doc.push_fragment(Phase::PackageInvocation, Some(platform.triplet.as_str()), vec![line]);
    }

    for platform in platforms {
        debug!(triplet = %platform.triplet, archive = %platform.archive_name(), "upload step");
        doc.push_fragment(
            Phase::Upload,
            Some(platform.triplet.as_str()),
            step_lines(&steps::upload_step(platform)),
        );
    }

    info!(
        platforms = platforms.len(),
        trigger = config.trigger.kind(),
        toolchain = ?config.toolchain,
        cache = config.cache,
        lines = doc.lines().len(),
        "generated workflow"
    );
    Ok(doc)
}

/// Generate and serialize in one call.
pub fn render_workflow(config: &WorkflowConfig, platforms: &[PlatformSpec]) -> Result<String> {
    Ok(generate(config, platforms)?.render())
}

/// Write a finished document to `path`.
pub fn write_workflow(path: &Path, doc: &WorkflowDocument) -> Result<()> {
    std::fs::write(path, doc.render()).map_err(|source| WorkflowError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote workflow");
    Ok(())
}

fn step_lines(step: &crate::emit::Mapping) -> Vec<String> {
    let mut out = Vec::new();
    render_sequence_item(step, STEP_INDENT, &mut out);
    out
}
