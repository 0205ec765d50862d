//! Workflow header and step builders.
//!
//! Every step is returned as an ordered [`Mapping`]; the generator decides
//! where in the document it goes.

use prebuild_targets::PlatformSpec;

use crate::config::{ToolchainSource, Trigger, WorkflowConfig};
use crate::emit::{Mapping, Value};

/// Job identifier of the single release job.
pub const JOB_ID: &str = "release";
/// Step id the upload steps read `upload_url` from.
pub const RELEASE_STEP_ID: &str = "create_release";

pub const VCPKG_REPOSITORY: &str = "https://github.com/microsoft/vcpkg";
pub const VCPKG_ACTION: &str = "johnwason/vcpkg-action@v5";
/// Directory vcpkg keeps its binary cache archives in on Linux runners.
pub const VCPKG_ARCHIVES: &str = "~/.cache/vcpkg/archives";
pub const ASSET_CONTENT_TYPE: &str = "application/gzip";

const WORKSPACE: &str = "${{ github.workspace }}";
const VCPKG_ROOT: &str = "${{ env.VCPKG_ROOT }}";
const VCPKG_REVISION: &str = "${{ env.VCPKG_REVISION }}";
const Z3_VERSION: &str = "${{ env.Z3_VERSION }}";
const GITHUB_TOKEN: &str = "${{ github.token }}";

/// The `on:` block.
pub fn trigger_block(trigger: &Trigger) -> Mapping {
    match trigger {
        Trigger::Push { branches } => Mapping::new().with(
            "push",
            Value::Map(Mapping::new().with("branches", Value::flow(branches))),
        ),
        Trigger::Tag { patterns } => Mapping::new().with(
            "push",
            Value::Map(Mapping::new().with("tags", Value::flow(patterns))),
        ),
        Trigger::Dispatch => Mapping::new().with("workflow_dispatch", Value::Null),
    }
}

/// Job environment: vcpkg location and the two version pins.
pub fn job_env(config: &WorkflowConfig) -> Mapping {
    Mapping::new()
        .with("VCPKG_ROOT", Value::str(format!("{WORKSPACE}/vcpkg")))
        .with("VCPKG_REVISION", Value::str(&config.vcpkg_revision))
        .with("Z3_VERSION", Value::str(&config.z3_version))
}

/// Top-level document up to and including the setup steps. Further steps
/// are appended as items of the trailing `steps:` sequence.
pub fn preamble(config: &WorkflowConfig) -> Mapping {
    let job = Mapping::new()
        .with("name", Value::str("Create Release"))
        .with("runs-on", Value::str(&config.runner))
        .with("env", Value::Map(job_env(config)))
        .with("steps", Value::Seq(setup_steps(config)));

    Mapping::new()
        .with("name", Value::str(&config.name))
        .with("on", Value::Map(trigger_block(&config.trigger)))
        .with("jobs", Value::Map(Mapping::new().with(JOB_ID, Value::Map(job))))
}

/// Release creation, checkout, and any toolchain setup.
pub fn setup_steps(config: &WorkflowConfig) -> Vec<Mapping> {
    let mut steps = vec![create_release_step(), checkout_step()];
    if config.toolchain == ToolchainSource::Bootstrap {
        if config.cache {
            steps.push(cache_step());
        }
        steps.push(bootstrap_step());
    }
    steps
}

pub fn create_release_step() -> Mapping {
    Mapping::new()
        .with("name", Value::str("Create Release"))
        .with("id", Value::str(RELEASE_STEP_ID))
        .with("uses", Value::str("actions/create-release@v1"))
        .with(
            "env",
            Value::Map(
                Mapping::new().with("GITHUB_TOKEN", Value::str("${{ secrets.GITHUB_TOKEN }}")),
            ),
        )
        .with(
            "with",
            Value::Map(
                Mapping::new()
                    .with("tag_name", Value::str(Z3_VERSION))
                    .with("release_name", Value::str(Z3_VERSION))
                    .with("draft", Value::bool(false))
                    .with("prerelease", Value::bool(false)),
            ),
        )
}

pub fn checkout_step() -> Mapping {
    Mapping::new()
        .with("uses", Value::str("actions/checkout@v4"))
        .with(
            "with",
            Value::Map(Mapping::new().with("submodules", Value::str("recursive"))),
        )
}

/// Restore and save vcpkg's binary archives across runs.
pub fn cache_step() -> Mapping {
    Mapping::new()
        .with("name", Value::str("cache vcpkg binaries"))
        .with("uses", Value::str("actions/cache@v4"))
        .with(
            "with",
            Value::Map(
                Mapping::new()
                    .with("path", Value::str(VCPKG_ARCHIVES))
                    .with(
                        "key",
                        Value::str(format!("vcpkg-z3-{VCPKG_REVISION}-{Z3_VERSION}")),
                    ),
            ),
        )
}

/// Clone vcpkg at the pinned revision and build the tool itself.
pub fn bootstrap_step() -> Mapping {
    Mapping::new().with("name", Value::str("bootstrap vcpkg")).with(
        "run",
        Value::literal([
            format!("git clone {VCPKG_REPOSITORY} {VCPKG_ROOT}"),
            format!("git -C {VCPKG_ROOT} checkout {VCPKG_REVISION}"),
            format!("{VCPKG_ROOT}/bootstrap-vcpkg.sh -disableMetrics"),
        ]),
    )
}

/// Fetch and build z3 for one triplet.
pub fn build_step(platform: &PlatformSpec, config: &WorkflowConfig) -> Mapping {
    let step = Mapping::new().with("name", Value::str("vcpkg build z3"));
    match config.toolchain {
        ToolchainSource::Action => {
            let mut with = Mapping::new()
                .with("pkgs", Value::str("z3"))
                .with("triplet", Value::str(&platform.triplet));
            if config.cache {
                with.insert(
                    "cache-key",
                    Value::str(format!("z3-{}-{VCPKG_REVISION}", platform.triplet)),
                );
            } else {
                with.insert("disable-cache", Value::bool(true));
            }
            with.insert("revision", Value::str(VCPKG_REVISION));
            with.insert("token", Value::str(GITHUB_TOKEN));
            with.insert("extra-args", Value::str("--clean-buildtrees-after-build"));

            step.with("uses", Value::str(VCPKG_ACTION))
                .with("with", Value::Map(with))
        }
        ToolchainSource::Bootstrap => step.with(
            "run",
            Value::str(format!(
                "{VCPKG_ROOT}/vcpkg install z3:{} --clean-buildtrees-after-build",
                platform.triplet
            )),
        ),
    }
}

/// One packaging script call: workspace, vcpkg root, triplet, library.
pub fn package_invocation(platform: &PlatformSpec, config: &WorkflowConfig) -> String {
    format!(
        "sh {} {WORKSPACE} {VCPKG_ROOT} {} {}",
        config.package_script, platform.triplet, platform.library_file_name
    )
}

/// The packaging step, with one invocation line per platform.
pub fn package_step(platforms: &[PlatformSpec], config: &WorkflowConfig) -> Mapping {
    Mapping::new()
        .with("name", Value::str("prepare artifact"))
        .with(
            "run",
            Value::literal(platforms.iter().map(|p| package_invocation(p, config))),
        )
}

/// Upload one triplet's archive to the release.
pub fn upload_step(platform: &PlatformSpec) -> Mapping {
    let archive = platform.archive_name();
    Mapping::new()
        .with("name", Value::str("upload artifact"))
        .with("uses", Value::str("actions/upload-release-asset@v1"))
        .with(
            "env",
            Value::Map(Mapping::new().with("GITHUB_TOKEN", Value::str(GITHUB_TOKEN))),
        )
        .with(
            "with",
            Value::Map(
                Mapping::new()
                    .with(
                        "upload_url",
                        Value::str(format!(
                            "${{{{ steps.{RELEASE_STEP_ID}.outputs.upload_url }}}}"
                        )),
                    )
                    .with("asset_path", Value::str(format!("{WORKSPACE}/{archive}")))
                    .with("asset_name", Value::str(&archive))
                    .with("asset_content_type", Value::str(ASSET_CONTENT_TYPE)),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::to_lines;

    #[test]
    fn push_trigger_block() {
        assert_eq!(
            to_lines(&trigger_block(&Trigger::push())),
            ["push:", "  branches: [ upload-prebuilt-static-z3 ]"]
        );
    }

    #[test]
    fn tag_trigger_block_quotes_wildcard() {
        assert_eq!(
            to_lines(&trigger_block(&Trigger::tag())),
            ["push:", "  tags: [ '*' ]"]
        );
    }

    #[test]
    fn dispatch_trigger_block() {
        assert_eq!(to_lines(&trigger_block(&Trigger::Dispatch)), ["workflow_dispatch:"]);
    }

    #[test]
    fn action_build_step_disables_cache_by_default() {
        let step = build_step(&PlatformSpec::linux_x64(), &WorkflowConfig::default());
        let Some(Value::Map(with)) = step.get("with") else {
            panic!("missing with block");
        };
        assert_eq!(with.get("triplet"), Some(&Value::str("x64-linux")));
        assert_eq!(with.get("disable-cache"), Some(&Value::bool(true)));
        assert!(with.get("cache-key").is_none());
    }

    #[test]
    fn action_build_step_with_cache_key() {
        let config = WorkflowConfig {
            cache: true,
            ..WorkflowConfig::default()
        };
        let step = build_step(&PlatformSpec::macos_x64(), &config);
        let Some(Value::Map(with)) = step.get("with") else {
            panic!("missing with block");
        };
        assert_eq!(
            with.get("cache-key"),
            Some(&Value::str("z3-x64-osx-${{ env.VCPKG_REVISION }}"))
        );
        assert!(with.get("disable-cache").is_none());
    }

    #[test]
    fn bootstrap_build_step_runs_vcpkg() {
        let config = WorkflowConfig {
            toolchain: ToolchainSource::Bootstrap,
            ..WorkflowConfig::default()
        };
        let step = build_step(&PlatformSpec::windows_x64_static_md(), &config);
        assert!(step.get("uses").is_none());
        assert_eq!(
            step.get("run"),
            Some(&Value::str(
                "${{ env.VCPKG_ROOT }}/vcpkg install z3:x64-windows-static-md --clean-buildtrees-after-build"
            ))
        );
    }

    #[test]
    fn setup_steps_per_toolchain() {
        let action = WorkflowConfig::default();
        assert_eq!(setup_steps(&action).len(), 2);

        let bootstrap = WorkflowConfig {
            toolchain: ToolchainSource::Bootstrap,
            ..WorkflowConfig::default()
        };
        assert_eq!(setup_steps(&bootstrap).len(), 3);

        let cached = WorkflowConfig {
            cache: true,
            ..bootstrap
        };
        let steps = setup_steps(&cached);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[2].get("uses"), Some(&Value::str("actions/cache@v4")));
    }

    #[test]
    fn package_invocation_arguments() {
        let line = package_invocation(&PlatformSpec::linux_x64(), &WorkflowConfig::default());
        assert_eq!(
            line,
            "sh z3-sys/scripts/make_artifact.sh ${{ github.workspace }} ${{ env.VCPKG_ROOT }} x64-linux libz3.a"
        );
    }

    #[test]
    fn upload_step_lines() {
        let mut out = Vec::new();
        crate::emit::render_sequence_item(&upload_step(&PlatformSpec::macos_x64()), 6, &mut out);
        assert_eq!(
            out,
            [
                "      - name: upload artifact",
                "        uses: actions/upload-release-asset@v1",
                "        env:",
                "          GITHUB_TOKEN: ${{ github.token }}",
                "        with:",
                "          upload_url: ${{ steps.create_release.outputs.upload_url }}",
                "          asset_path: ${{ github.workspace }}/x64-osx.tar.gz",
                "          asset_name: x64-osx.tar.gz",
                "          asset_content_type: application/gzip",
            ]
        );
    }
}
