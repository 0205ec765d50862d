//! `z3-prebuild init` — write a starter `prebuild.toml`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{PrebuildManifest, MANIFEST_FILE};

/// Create `prebuild.toml` in `dir`, creating the directory if needed.
pub fn run(dir: &Path) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&path, PrebuildManifest::template())
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Created {}", path.display());
    println!("Run 'z3-prebuild generate' to write the workflow.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_loadable_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("z3-release");

        run(&project).unwrap();

        let (manifest, found) = PrebuildManifest::find_and_load(&project).unwrap().unwrap();
        assert_eq!(found, project);
        assert_eq!(manifest.workflow, prebuild_workflow::WorkflowConfig::default());
    }

    #[test]
    fn init_refuses_existing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "").unwrap();

        let err = run(dir.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
