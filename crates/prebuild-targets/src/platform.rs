//! Platform model.
//!
//! A [`PlatformSpec`] names one build of Z3: the runner it targets, the
//! vcpkg triplet that selects architecture, OS and linkage, and the
//! static library the packaging script picks up afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Extension of the compressed archive produced for each triplet.
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// One (runner, triplet, library) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformSpec {
    /// CI runner label (e.g., "ubuntu-latest").
    pub runner_label: String,
    /// vcpkg triplet (e.g., "x64-windows-static-md").
    pub triplet: String,
    /// Static library file name produced by the build (e.g., "libz3.a").
    pub library_file_name: String,
}

impl PlatformSpec {
    /// Construct a platform entry.
    pub fn new(
        runner_label: impl Into<String>,
        triplet: impl Into<String>,
        library_file_name: impl Into<String>,
    ) -> Self {
        Self {
            runner_label: runner_label.into(),
            triplet: triplet.into(),
            library_file_name: library_file_name.into(),
        }
    }

    /// Linux x86-64, static `libz3.a`.
    pub fn linux_x64() -> Self {
        Self::new("ubuntu-latest", "x64-linux", "libz3.a")
    }

    /// macOS x86-64, static `libz3.a`.
    pub fn macos_x64() -> Self {
        Self::new("macos-latest", "x64-osx", "libz3.a")
    }

    /// Windows x86-64, static library linked against the dynamic CRT.
    pub fn windows_x64_static_md() -> Self {
        Self::new("windows-latest", "x64-windows-static-md", "libz3.lib")
    }

    /// File name of the release archive for this triplet.
    pub fn archive_name(&self) -> String {
        format!("{}.{ARCHIVE_EXTENSION}", self.triplet)
    }

    /// Target architecture, taken from the first triplet component.
    pub fn arch(&self) -> &str {
        self.triplet.split('-').next().unwrap_or(&self.triplet)
    }

    /// Whether the triplet selects a static build.
    pub fn is_static(&self) -> bool {
        self.library_file_name.ends_with(".a")
            || self.triplet.split('-').any(|part| part == "static")
    }
}

/// The built-in platform table, in build order.
pub fn builtin_platforms() -> Vec<PlatformSpec> {
    vec![
        PlatformSpec::linux_x64(),
        PlatformSpec::macos_x64(),
        PlatformSpec::windows_x64_static_md(),
    ]
}

/// Find a platform by triplet.
pub fn find_platform<'a>(platforms: &'a [PlatformSpec], triplet: &str) -> Result<&'a PlatformSpec> {
    platforms
        .iter()
        .find(|p| p.triplet == triplet)
        .ok_or_else(|| TargetError::UnknownTriplet {
            triplet: triplet.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order() {
        let triplets: Vec<_> = builtin_platforms()
            .into_iter()
            .map(|p| p.triplet)
            .collect();
        assert_eq!(triplets, ["x64-linux", "x64-osx", "x64-windows-static-md"]);
    }

    #[test]
    fn windows_uses_lib() {
        let p = PlatformSpec::windows_x64_static_md();
        assert_eq!(p.library_file_name, "libz3.lib");
        assert_eq!(p.runner_label, "windows-latest");
        assert!(p.is_static());
    }

    #[test]
    fn archive_named_after_triplet() {
        assert_eq!(PlatformSpec::macos_x64().archive_name(), "x64-osx.tar.gz");
    }

    #[test]
    fn arch_component() {
        assert_eq!(PlatformSpec::linux_x64().arch(), "x64");
        assert_eq!(PlatformSpec::new("r", "arm64-osx", "libz3.a").arch(), "arm64");
    }

    #[test]
    fn find_known_and_unknown() {
        let platforms = builtin_platforms();
        assert_eq!(
            find_platform(&platforms, "x64-osx").unwrap().runner_label,
            "macos-latest"
        );
        assert!(matches!(
            find_platform(&platforms, "riscv64-linux"),
            Err(TargetError::UnknownTriplet { .. })
        ));
    }
}
