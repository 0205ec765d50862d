//! `z3-prebuild targets` — platform table listing and description.

use anyhow::{bail, Result};
use prebuild_targets::parse::{platforms_to_toml, validate_platforms};
use prebuild_targets::platform::find_platform;
use prebuild_targets::PlatformSpec;
use prebuild_workflow::steps::package_invocation;
use prebuild_workflow::WorkflowConfig;

/// List the platforms the workflow will build, in build order, followed by
/// any validation issues. With `toml`, print the table as a standalone
/// platforms file instead.
pub fn list(platforms: &[PlatformSpec], toml: bool) -> Result<()> {
    if toml {
        print!("{}", platforms_to_toml(platforms)?);
        return Ok(());
    }

    print!("{}", list_text(platforms));
    let errors = match validate_platforms(platforms) {
        Ok(_) => 0,
        Err(issues) => issues.iter().filter(|i| i.is_error()).count(),
    };
    if errors > 0 {
        bail!("platform table has {errors} error(s)");
    }
    Ok(())
}

fn list_text(platforms: &[PlatformSpec]) -> String {
    let mut out = format!("Platforms ({}):\n\n", platforms.len());
    for p in platforms {
        out.push_str(&format!(
            "  {:<25} {:<18} {}\n",
            p.triplet, p.runner_label, p.library_file_name
        ));
    }

    let issues = validate_platforms(platforms).unwrap_or_else(|issues| issues);
    if !issues.is_empty() {
        out.push_str("\nIssues:\n");
        for issue in &issues {
            out.push_str(&format!("  {issue}\n"));
        }
    }

    out.push_str("\nUse 'z3-prebuild targets describe <triplet>' for details.\n");
    out
}

/// Describe one platform and what the workflow does for it.
pub fn describe(platforms: &[PlatformSpec], config: &WorkflowConfig, triplet: &str) -> Result<()> {
    let platform = find_platform(platforms, triplet)?;
    print!("{}", describe_text(platform, config));
    Ok(())
}

fn describe_text(platform: &PlatformSpec, config: &WorkflowConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Platform: {} ===\n", platform.triplet));
    out.push_str(&format!("  Runner:       {}\n", platform.runner_label));
    out.push_str(&format!("  Architecture: {}\n", platform.arch()));
    out.push_str(&format!(
        "  Library:      {}{}\n",
        platform.library_file_name,
        if platform.is_static() { " (static)" } else { "" }
    ));
    out.push_str(&format!("  Archive:      {}\n", platform.archive_name()));
    out.push('\n');
    out.push_str("--- Packaging ---\n");
    out.push_str(&format!("  {}\n", package_invocation(platform, config)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use prebuild_targets::builtin_platforms;

    #[test]
    fn list_builtin() {
        assert!(list(&builtin_platforms(), false).is_ok());
        assert!(list(&builtin_platforms(), true).is_ok());
    }

    #[test]
    fn list_builtin_has_no_issues() {
        let text = list_text(&builtin_platforms());
        assert!(text.starts_with("Platforms (3):\n"));
        assert!(!text.contains("Issues:"));
    }

    #[test]
    fn list_reports_warnings() {
        let platforms = vec![PlatformSpec::new("windows-latest", "x64-windows-static", "libz3.a")];
        let text = list_text(&platforms);
        assert!(text.contains(
            "Issues:\n  warning: windows triplet 'x64-windows-static' usually produces a .lib, not 'libz3.a'\n"
        ));
        assert!(list(&platforms, false).is_ok());
    }

    #[test]
    fn list_fails_on_errors() {
        let platforms = vec![PlatformSpec::new("ubuntu-latest", "x64-linux", "libz3.so")];
        assert!(list_text(&platforms).contains("  error: library 'libz3.so'"));
        let err = list(&platforms, false).unwrap_err();
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn describe_known_triplet() {
        let config = WorkflowConfig::default();
        assert!(describe(&builtin_platforms(), &config, "x64-osx").is_ok());
    }

    #[test]
    fn describe_unknown_triplet() {
        let config = WorkflowConfig::default();
        let err = describe(&builtin_platforms(), &config, "nonexistent").unwrap_err();
        assert!(err.to_string().contains("unknown triplet"));
    }

    #[test]
    fn describe_windows_text() {
        let text = describe_text(&PlatformSpec::windows_x64_static_md(), &WorkflowConfig::default());
        assert!(text.contains("Runner:       windows-latest\n"));
        assert!(text.contains("Library:      libz3.lib (static)\n"));
        assert!(text.contains("Archive:      x64-windows-static-md.tar.gz\n"));
        assert!(text.ends_with("x64-windows-static-md libz3.lib\n"));
    }
}
