//! Platform table for prebuilt Z3 release workflows.
//!
//! Each entry pairs a CI runner label with the vcpkg triplet to build and
//! the static library file the build leaves behind:
//! - **Model:** [`platform::PlatformSpec`] and the built-in table
//! - **Files:** loading, validating and discovering custom tables in TOML

pub mod error;
pub mod parse;
pub mod platform;

pub use error::{Result, TargetError};
pub use platform::{builtin_platforms, PlatformSpec};
