//! Workflow generator for prebuilt static Z3 release assets.
//!
//! One routine, [`generate::generate`], turns a [`config::WorkflowConfig`]
//! and a platform table into a [`document::WorkflowDocument`]:
//!
//! 1. preamble: trigger, job, environment pins, release and checkout steps
//! 2. one vcpkg build step per platform
//! 3. one packaging step with an invocation line per platform
//! 4. one release-asset upload step per platform

pub mod config;
pub mod document;
pub mod emit;
pub mod error;
pub mod generate;
pub mod steps;

pub use config::{ToolchainSource, Trigger, WorkflowConfig};
pub use document::{Phase, WorkflowDocument};
pub use error::{Result, WorkflowError};
pub use generate::{generate, render_workflow, write_workflow};
