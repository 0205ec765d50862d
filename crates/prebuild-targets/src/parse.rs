//! TOML parsing, serialization, and validation for platform tables.
//!
//! A platform table is a list of `[[platforms]]` entries. It can live in a
//! standalone `.platforms.toml` file or inline in a project manifest.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TargetError};
use crate::platform::PlatformSpec;

/// File layout of a standalone platform table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTable {
    /// Entries in build order.
    pub platforms: Vec<PlatformSpec>,
}

/// A validation issue found in a platform table.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: "error",
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: "warning",
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == "error"
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Load a platform table from a TOML file.
pub fn load_platforms_toml(path: &Path) -> Result<Vec<PlatformSpec>> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let platforms = parse_platforms_toml(&content)?;
    debug!(path = %path.display(), count = platforms.len(), "loaded platform table");
    Ok(platforms)
}

/// Parse a platform table from a TOML string.
pub fn parse_platforms_toml(toml_str: &str) -> Result<Vec<PlatformSpec>> {
    let table: PlatformTable = toml::from_str(toml_str)?;
    Ok(table.platforms)
}

/// Serialize a platform table to pretty TOML.
pub fn platforms_to_toml(platforms: &[PlatformSpec]) -> Result<String> {
    let table = PlatformTable {
        platforms: platforms.to_vec(),
    };
    Ok(toml::to_string_pretty(&table)?)
}

/// Check a platform table for problems that would break the workflow.
///
/// Returns `Ok(warnings)` if no errors were found, or `Err(issues)` with
/// every issue found, warnings included.
pub fn validate_platforms(
    platforms: &[PlatformSpec],
) -> std::result::Result<Vec<ValidationIssue>, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if platforms.is_empty() {
        issues.push(ValidationIssue::error("platform table is empty"));
    }

    let mut seen = HashSet::new();
    for p in platforms {
        if p.triplet.trim().is_empty() {
            issues.push(ValidationIssue::error("platform has an empty triplet"));
            continue;
        }
        if p.triplet.chars().any(char::is_whitespace) {
            issues.push(ValidationIssue::error(format!(
                "triplet '{}' contains whitespace",
                p.triplet
            )));
        }
        if !seen.insert(p.triplet.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "triplet '{}' is listed more than once",
                p.triplet
            )));
        }
        if p.runner_label.trim().is_empty() {
            issues.push(ValidationIssue::error(format!(
                "triplet '{}' has an empty runner label",
                p.triplet
            )));
        }
        let lib = &p.library_file_name;
        if lib.trim().is_empty() || lib.chars().any(char::is_whitespace) {
            issues.push(ValidationIssue::error(format!(
                "triplet '{}' has an invalid library file name '{}'",
                p.triplet, lib
            )));
        } else if !(lib.ends_with(".a") || lib.ends_with(".lib")) {
            issues.push(ValidationIssue::error(format!(
                "library '{}' for triplet '{}' is not a static library (.a or .lib)",
                lib, p.triplet
            )));
        }
        if p.triplet.contains("windows") && lib.ends_with(".a") {
            issues.push(ValidationIssue::warning(format!(
                "windows triplet '{}' usually produces a .lib, not '{}'",
                p.triplet, lib
            )));
        }
    }

    if issues.iter().any(ValidationIssue::is_error) {
        Err(issues)
    } else {
        Ok(issues)
    }
}

/// Validate, folding errors into a single [`TargetError::Validation`].
///
/// On success the warnings are returned for the caller to report.
pub fn ensure_valid(platforms: &[PlatformSpec]) -> Result<Vec<ValidationIssue>> {
    validate_platforms(platforms).map_err(|issues| {
        let detail = issues
            .iter()
            .filter(|i| i.is_error())
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        TargetError::Validation { detail }
    })
}
