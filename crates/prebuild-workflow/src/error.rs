//! Workflow generation errors.

use std::path::PathBuf;

use prebuild_targets::TargetError;
use thiserror::Error;

/// Convenience alias for results within the workflow crate.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that can occur while building or writing a workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("platform table: {0}")]
    Targets(#[from] TargetError),

    #[error("invalid workflow config: {detail}")]
    InvalidConfig { detail: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
