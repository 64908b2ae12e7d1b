//! Error types for bundling operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BundleConfigBuilderError;

/// Errors that abort a bundling run.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output artifact could not be opened for writing.
    #[error("Cannot open output file {path}: {source}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output stream failed mid-run.
    #[error("Failed writing bundle output: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl BundleError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an output write error.
    pub fn write(source: std::io::Error) -> Self {
        Self::Write { source }
    }
}

impl From<BundleConfigBuilderError> for BundleError {
    fn from(err: BundleConfigBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

/// Why a file was left out of the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipKind {
    /// The running executable itself.
    ScriptFile,
    /// The output artifact being written.
    OutputFile,
    /// The file could not be read.
    ReadError,
    /// The file content is not valid UTF-8.
    NotUtf8,
    /// A directory entry could not be listed.
    WalkError,
}

/// Non-fatal diagnostic recorded for a skipped entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipWarning {
    /// Path of the skipped entry.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of skip.
    pub kind: SkipKind,
}

impl SkipWarning {
    /// Create a new skip warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: SkipKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// The running executable was found inside the tree.
    pub fn script_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Skipping script file: {}", path.display()),
            path,
            kind: SkipKind::ScriptFile,
        }
    }

    /// The output artifact was found inside the tree.
    pub fn output_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Skipping output file: {}", path.display()),
            path,
            kind: SkipKind::OutputFile,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!(
                "Could not read file {} (permission error or encoding issue?): {error}",
                path.display()
            ),
            path,
            kind: SkipKind::ReadError,
        }
    }

    /// Create a decode error warning.
    pub fn not_utf8(path: impl Into<PathBuf>, error: &std::string::FromUtf8Error) -> Self {
        let path = path.into();
        Self {
            message: format!(
                "Could not read file {} (permission error or encoding issue?): {error}",
                path.display()
            ),
            path,
            kind: SkipKind::NotUtf8,
        }
    }
}
