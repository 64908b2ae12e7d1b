//! Run report and dry-run entries.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use codebundle_core::{SkipKind, SkipWarning};

/// Summary of a finished bundling run.
#[derive(Debug, Clone, Serialize)]
pub struct BundleReport {
    /// Resolved root directory.
    pub root: PathBuf,
    /// Resolved output file, when the run wrote one.
    pub output: Option<PathBuf>,
    /// Number of records written.
    pub files_written: u64,
    /// Content bytes written, excluding headers and separators.
    pub bytes_written: u64,
    /// Files rejected by the directory or extension rules.
    pub files_filtered: u64,
    /// Diagnostics for files that were skipped.
    pub warnings: Vec<SkipWarning>,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl BundleReport {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self {
            root,
            output: None,
            files_written: 0,
            bytes_written: 0,
            files_filtered: 0,
            warnings: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Number of skip diagnostics of the given kind.
    pub fn count(&self, kind: SkipKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    /// Whether any file failed to read or decode.
    pub fn has_read_failures(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w.kind, SkipKind::ReadError | SkipKind::NotUtf8 | SkipKind::WalkError))
    }
}

/// A file a run would bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleEntry {
    /// Path relative to the root, as written in the header.
    pub relative: PathBuf,
    /// Absolute path on disk.
    pub absolute: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = BundleReport::new(PathBuf::from("/r"));
        assert!(!report.has_read_failures());

        report.warnings.push(SkipWarning::output_file("out.txt"));
        assert_eq!(report.count(SkipKind::OutputFile), 1);
        assert!(!report.has_read_failures());

        report
            .warnings
            .push(SkipWarning::new("bad.txt", "invalid utf-8", SkipKind::NotUtf8));
        assert!(report.has_read_failures());
        assert_eq!(report.count(SkipKind::ReadError), 0);
    }
}
