//! Bundle configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Directories whose contents are never bundled.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] =
    &[".git", "node_modules", "dist", "build", "venv", "__pycache__"];

/// File extensions bundled by default (compared case-insensitively).
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".html", ".css", ".md", ".txt", ".sh", ".yml", ".yaml", ".json", ".xml",
    ".java", ".c", ".cpp", ".h", ".hpp", ".cs", ".go", ".rb", ".php", ".swift", ".kt", ".scala",
    ".r", ".vue", ".jsx", ".tsx", ".sql",
];

/// Output filename used when none is given.
pub const DEFAULT_OUTPUT: &str = "bundled_code.txt";

/// Configuration for a bundling run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct BundleConfig {
    /// Root directory to walk.
    #[builder(default = "PathBuf::from(\".\")")]
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Output file. Relative paths resolve against the working directory.
    #[builder(default = "PathBuf::from(DEFAULT_OUTPUT)")]
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Excluded directories. Relative entries are resolved against `root`.
    #[builder(default = "default_exclude_dirs()")]
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<PathBuf>,

    /// Allowed file extensions, with or without the leading dot.
    #[builder(default = "default_extensions()")]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Descend into symlinked directories.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Visit directory entries in name order instead of listing order.
    #[builder(default = "false")]
    #[serde(default)]
    pub sort_entries: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_exclude_dirs() -> Vec<PathBuf> {
    DEFAULT_EXCLUDE_DIRS.iter().map(PathBuf::from).collect()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

impl BundleConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        }
        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                return Err("Output path cannot be empty".to_string());
            }
        }
        if let Some(ref dirs) = self.exclude_dirs {
            if dirs.iter().any(|dir| dir.as_os_str().is_empty()) {
                return Err("Excluded directory entries cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl BundleConfig {
    /// Create a new bundle config builder.
    pub fn builder() -> BundleConfigBuilder {
        BundleConfigBuilder::default()
    }

    /// Create a config with default lists for the given root and output.
    pub fn new(root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output: output.into(),
            exclude_dirs: default_exclude_dirs(),
            extensions: default_extensions(),
            follow_symlinks: false,
            sort_entries: false,
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self::new(default_root(), default_output())
    }
}
