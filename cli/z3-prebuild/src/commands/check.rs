//! `z3-prebuild check` — verify the committed workflow is up to date.

use std::path::Path;

use anyhow::{bail, Context, Result};
use prebuild_workflow::render_workflow;

use crate::commands::generate::{resolve, WorkflowArgs, STDOUT};
use crate::manifest::PrebuildManifest;

/// Regenerate in memory and compare with the file on disk.
pub fn run(project_dir: &Path, manifest: Option<&PrebuildManifest>, args: &WorkflowArgs) -> Result<()> {
    let (config, platforms) = resolve(project_dir, manifest, args)?;
    if config.output.as_os_str() == STDOUT {
        bail!("check needs a file to compare against, not stdout");
    }

    let expected = render_workflow(&config, &platforms).context("generating workflow")?;
    let path = project_dir.join(&config.output);
    if !path.is_file() {
        bail!(
            "{} does not exist (run `z3-prebuild generate`)",
            path.display()
        );
    }
    let actual =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;

    if actual != expected {
        let line = first_difference(&actual, &expected);
        bail!(
            "{} is out of date, first difference at line {line} (run `z3-prebuild generate`)",
            path.display()
        );
    }

    println!("{} is up to date", path.display());
    Ok(())
}

/// 1-based line number of the first line that differs.
fn first_difference(a: &str, b: &str) -> usize {
    let mut right = b.lines();
    for (i, line) in a.lines().enumerate() {
        if right.next() != Some(line) {
            return i + 1;
        }
    }
    a.lines().count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::generate;

    #[test]
    fn fresh_workflow_passes() {
        let dir = tempfile::tempdir().unwrap();
        generate::run(dir.path(), None, &WorkflowArgs::default()).unwrap();
        run(dir.path(), None, &WorkflowArgs::default()).unwrap();
    }

    #[test]
    fn missing_workflow_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), None, &WorkflowArgs::default()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn changed_variant_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        generate::run(dir.path(), None, &WorkflowArgs::default()).unwrap();

        let args = WorkflowArgs {
            trigger: Some(generate::TriggerArg::Dispatch),
            ..WorkflowArgs::default()
        };
        let err = run(dir.path(), None, &args).unwrap_err();
        assert!(err.to_string().contains("out of date, first difference at line 3"));
    }

    #[test]
    fn stdout_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = WorkflowArgs {
            output: Some(STDOUT.into()),
            ..WorkflowArgs::default()
        };
        assert!(run(dir.path(), None, &args).is_err());
    }

    #[test]
    fn first_difference_lines() {
        assert_eq!(first_difference("a\nb\n", "a\nc\n"), 2);
        assert_eq!(first_difference("a\n", "a\nb\n"), 2);
        assert_eq!(first_difference("x", "y"), 1);
    }
}
