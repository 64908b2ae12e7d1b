//! Inclusion filter deciding which files end up in a bundle.
//!
//! Directory exclusion is a relation over normalized path segments, so an
//! entry `build` excludes `build/sub/file.py` but never `build2/file.py` or
//! `build-extra/file.py`.
//!
//! ```
//! use codebundle_core::InclusionFilter;
//!
//! let filter = InclusionFilter::new(["build"], [".py"]);
//! assert!(filter.should_include("src/main.py"));
//! assert!(filter.should_include("build-extra/main.py"));
//! assert!(!filter.should_include("build/sub/main.py"));
//! assert!(!filter.should_include("src/main.rs"));
//! ```

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::config::BundleConfig;

/// Outcome of running a candidate file through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The file goes into the bundle.
    Include,
    /// The file is the running executable.
    ScriptFile,
    /// The file is the output artifact.
    OutputFile,
    /// The file lies under an excluded directory.
    ExcludedDir,
    /// The file's extension is not on the allow-list.
    ExtensionNotAllowed,
}

impl Decision {
    /// Whether the file should be written.
    pub fn is_include(self) -> bool {
        matches!(self, Decision::Include)
    }
}

/// Predicate over candidate paths built from a [`BundleConfig`].
#[derive(Debug, Clone)]
pub struct InclusionFilter {
    exclude_dirs: Vec<PathBuf>,
    extensions: HashSet<String>,
    script_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
}

impl InclusionFilter {
    /// Create a filter from exclusion entries and allowed extensions.
    pub fn new<D, E>(exclude_dirs: D, extensions: E) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<Path>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            exclude_dirs: exclude_dirs
                .into_iter()
                .map(|dir| normalize_path(dir.as_ref()))
                .collect(),
            extensions: extensions
                .into_iter()
                .filter_map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
            script_path: None,
            output_path: None,
        }
    }

    /// Create a filter from the lists in a config.
    pub fn from_config(config: &BundleConfig) -> Self {
        Self::new(&config.exclude_dirs, &config.extensions)
    }

    /// Always exclude the given absolute path as the running executable.
    pub fn with_script_path(mut self, path: impl AsRef<Path>) -> Self {
        self.script_path = Some(normalize_path(path.as_ref()));
        self
    }

    /// Always exclude the given absolute path as the output artifact.
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = Some(normalize_path(path.as_ref()));
        self
    }

    /// Normalized exclusion entries.
    pub fn exclude_dirs(&self) -> &[PathBuf] {
        &self.exclude_dirs
    }

    /// Allowed extensions, lowercase and without the leading dot, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Decide inclusion for one path using the directory and extension rules.
    ///
    /// Relative exclusion entries are matched against the path as given;
    /// absolute entries and the fixed exclusions only match absolute paths.
    pub fn should_include(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.decide(path, path).is_include()
    }

    /// Full decision for a file given its root-relative and absolute paths.
    pub fn decide(&self, relative: &Path, absolute: &Path) -> Decision {
        if self.script_path.is_some() || self.output_path.is_some() {
            let absolute = normalize_path(absolute);
            if self.script_path.as_ref() == Some(&absolute) {
                return Decision::ScriptFile;
            }
            if self.output_path.as_ref() == Some(&absolute) {
                return Decision::OutputFile;
            }
        }
        if self.is_excluded_dir(relative, absolute) {
            return Decision::ExcludedDir;
        }
        if !self.extension_allowed(relative) {
            return Decision::ExtensionNotAllowed;
        }
        Decision::Include
    }

    /// Whether a path equals or lies under any excluded directory.
    pub fn is_excluded_dir(&self, relative: &Path, absolute: &Path) -> bool {
        self.exclude_dirs.iter().any(|dir| {
            if dir.is_absolute() {
                is_under(absolute, dir)
            } else {
                is_under(relative, dir)
            }
        })
    }

    /// Whether the file name's extension is on the allow-list.
    pub fn extension_allowed(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| self.extensions.contains(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for InclusionFilter {
    fn default() -> Self {
        Self::from_config(&BundleConfig::default())
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let segments = segments(path);
    if segments.is_empty() {
        PathBuf::from(".")
    } else {
        segments.iter().collect()
    }
}

/// Whether `candidate` equals `ancestor` or lies beneath it, compared on
/// normalized path segments.
pub fn is_under(candidate: impl AsRef<Path>, ancestor: impl AsRef<Path>) -> bool {
    let candidate = segments(candidate.as_ref());
    let ancestor = segments(ancestor.as_ref());
    candidate.len() >= ancestor.len() && candidate[..ancestor.len()] == ancestor[..]
}

fn segments(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.');
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}
