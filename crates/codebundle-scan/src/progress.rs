//! Bundle progress reporting.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Progress information during a bundling run.
#[derive(Debug, Clone)]
pub struct BundleProgress {
    /// Number of files looked at so far.
    pub files_seen: u64,
    /// Number of files written to the bundle so far.
    pub files_written: u64,
    /// Number of directories entered so far.
    pub dirs_seen: u64,
    /// Content bytes written so far.
    pub bytes_written: u64,
    /// Current path being processed.
    pub current_path: PathBuf,
    /// Number of skip diagnostics recorded.
    pub skipped_count: u64,
    /// Time elapsed since the run started.
    pub elapsed: Duration,
}

impl BundleProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_seen: 0,
            files_written: 0,
            dirs_seen: 0,
            bytes_written: 0,
            current_path: PathBuf::new(),
            skipped_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate throughput in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_seen as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for BundleProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal progress tracker with timing.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    files_seen: u64,
    files_written: u64,
    dirs_seen: u64,
    bytes_written: u64,
    skipped_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            files_seen: 0,
            files_written: 0,
            dirs_seen: 0,
            bytes_written: 0,
            skipped_count: 0,
            current_path: PathBuf::new(),
        }
    }

    /// Record a file reaching the filter. Returns the running count.
    pub fn record_seen(&mut self, path: PathBuf) -> u64 {
        self.files_seen += 1;
        self.current_path = path;
        self.files_seen
    }

    pub fn record_written(&mut self, bytes: u64) {
        self.files_written += 1;
        self.bytes_written += bytes;
    }

    pub fn record_dir(&mut self) {
        self.dirs_seen += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped_count += 1;
    }

    pub fn files_written(&self) -> u64 {
        self.files_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> BundleProgress {
        BundleProgress {
            files_seen: self.files_seen,
            files_written: self.files_written,
            dirs_seen: self.dirs_seen,
            bytes_written: self.bytes_written,
            current_path: self.current_path.clone(),
            skipped_count: self.skipped_count,
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
