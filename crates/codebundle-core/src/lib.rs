//! Core types for codebundle.
//!
//! This crate provides the configuration, the inclusion filter, and the
//! error and diagnostic types shared by the bundler and the CLI.

mod config;
mod error;
mod filter;

pub use config::{
    BundleConfig, BundleConfigBuilder, BundleConfigBuilderError, DEFAULT_EXCLUDE_DIRS,
    DEFAULT_EXTENSIONS, DEFAULT_OUTPUT,
};
pub use error::{BundleError, SkipKind, SkipWarning};
pub use filter::{Decision, InclusionFilter, is_under, normalize_path};
