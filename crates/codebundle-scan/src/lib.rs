//! Directory walking and bundle writing for codebundle.
//!
//! This crate walks a directory tree with jwalk in serial mode, runs every
//! file through the [`InclusionFilter`], and concatenates the survivors into
//! a single text artifact.
//!
//! # Overview
//!
//! - **Top-down pruning** of excluded directories before descent
//! - **Self-exclusion** of the running executable and the output file
//! - **Partial-failure tolerance**: unreadable or non-UTF-8 files are
//!   skipped and reported, the walk goes on
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use codebundle_scan::{BundleConfig, Bundler};
//!
//! let config = BundleConfig::new(".", "project_code_bundle.txt");
//! let report = Bundler::new().bundle(&config).unwrap();
//!
//! println!("Bundled {} files", report.files_written);
//! for warning in &report.warnings {
//!     println!("skipped: {}", warning.message);
//! }
//! ```
//!
//! # Dry run
//!
//! ```rust,no_run
//! use codebundle_scan::{BundleConfig, Bundler};
//!
//! let config = BundleConfig::default();
//! for entry in Bundler::new().collect(&config).unwrap() {
//!     println!("{} ({} bytes)", entry.relative.display(), entry.size);
//! }
//! ```

mod bundler;
mod progress;
mod record;
mod report;

pub use bundler::Bundler;
pub use progress::BundleProgress;
pub use record::{HEADER_PREFIX, HEADER_SUFFIX, RECORD_SEPARATOR, header_line, write_record};
pub use report::{BundleEntry, BundleReport};

// Re-export core types for convenience
pub use codebundle_core::{
    BundleConfig, BundleConfigBuilder, BundleError, Decision, InclusionFilter, SkipKind,
    SkipWarning,
};
