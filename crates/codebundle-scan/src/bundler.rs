//! Sequential directory walker that writes the bundle.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use codebundle_core::{
    BundleConfig, BundleError, Decision, InclusionFilter, SkipKind, SkipWarning,
};

use crate::progress::{BundleProgress, ProgressTracker};
use crate::record::write_record;
use crate::report::{BundleEntry, BundleReport};

/// Files seen between two progress broadcasts.
const PROGRESS_INTERVAL: u64 = 100;

/// Walks a tree and concatenates the selected files into one artifact.
pub struct Bundler {
    progress_tx: broadcast::Sender<BundleProgress>,
    script_path: Option<PathBuf>,
}

impl Bundler {
    /// Create a bundler that excludes the running executable.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        let script_path = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.canonicalize().ok());
        Self {
            progress_tx,
            script_path,
        }
    }

    /// Exclude `path` as the running program instead of the current executable.
    pub fn with_script_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.script_path = Some(path.canonicalize().unwrap_or(path));
        self
    }

    /// Subscribe to bundle progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<BundleProgress> {
        self.progress_tx.subscribe()
    }

    /// Write the bundle to `config.output`, creating or truncating it.
    ///
    /// Failing to open the output is the only setup error besides an invalid
    /// root; unreadable files are skipped and reported.
    pub fn bundle(&self, config: &BundleConfig) -> Result<BundleReport, BundleError> {
        let root = resolve_root(&config.root)?;

        let file = File::create(&config.output).map_err(|source| BundleError::OpenOutput {
            path: config.output.clone(),
            source,
        })?;
        let output = config
            .output
            .canonicalize()
            .map_err(|e| BundleError::io(&config.output, e))?;

        let filter = self.filter(config).with_output_path(&output);
        self.log_plan(config, Some(&output));

        let mut writer = BufWriter::new(file);
        let mut report = self.emit(config, &root, &filter, &mut writer)?;
        writer.flush().map_err(BundleError::write)?;
        report.output = Some(output);

        info!(
            files = report.files_written,
            bytes = report.bytes_written,
            "Bundling complete."
        );
        Ok(report)
    }

    /// Write the bundle into an arbitrary writer.
    pub fn write_bundle<W: Write>(
        &self,
        config: &BundleConfig,
        mut writer: W,
    ) -> Result<BundleReport, BundleError> {
        let root = resolve_root(&config.root)?;
        let filter = self.filter(config);
        self.log_plan(config, None);

        let report = self.emit(config, &root, &filter, &mut writer)?;
        writer.flush().map_err(BundleError::write)?;

        info!(
            files = report.files_written,
            bytes = report.bytes_written,
            "Bundling complete."
        );
        Ok(report)
    }

    /// List the files a run with `config` would bundle, without reading them.
    pub fn collect(&self, config: &BundleConfig) -> Result<Vec<BundleEntry>, BundleError> {
        let root = resolve_root(&config.root)?;
        let mut filter = self.filter(config);
        if let Some(output) = resolve_output(&config.output) {
            filter = filter.with_output_path(output);
        }

        let mut run = Run::new(root.clone());
        let mut entries = Vec::new();
        self.walk(config, &root, &filter, &mut run, |run, relative, absolute| {
            let metadata = match std::fs::metadata(absolute) {
                Ok(metadata) => metadata,
                Err(err) => {
                    let warning = SkipWarning::read_error(relative, &err);
                    warn!("{}", warning.message);
                    run.skip(warning);
                    return Ok(());
                }
            };
            entries.push(BundleEntry {
                relative: relative.to_path_buf(),
                absolute: absolute.to_path_buf(),
                size: metadata.len(),
            });
            Ok(())
        })?;

        Ok(entries)
    }

    fn filter(&self, config: &BundleConfig) -> InclusionFilter {
        let filter = InclusionFilter::from_config(config);
        match &self.script_path {
            Some(path) => filter.with_script_path(path),
            None => filter,
        }
    }

    fn log_plan(&self, config: &BundleConfig, output: Option<&Path>) {
        match output {
            Some(output) => info!(
                "Bundling code from '{}' into '{}'...",
                config.root.display(),
                output.display()
            ),
            None => info!("Bundling code from '{}'...", config.root.display()),
        }
        info!("Excluding directories: {:?}", config.exclude_dirs);
        info!("Including extensions: {:?}", config.extensions);

        if let Some(name) = self.script_path.as_deref().and_then(Path::file_name) {
            info!("Excluding script file: {}", name.to_string_lossy());
        }
        if let Some(name) = output.and_then(Path::file_name) {
            info!("Excluding output file: {}", name.to_string_lossy());
        }
    }

    /// Read and write every included file.
    fn emit<W: Write>(
        &self,
        config: &BundleConfig,
        root: &Path,
        filter: &InclusionFilter,
        writer: &mut W,
    ) -> Result<BundleReport, BundleError> {
        let mut run = Run::new(root.to_path_buf());

        self.walk(config, root, filter, &mut run, |run, relative, absolute| {
            // Read fully before the header goes out so a failure leaves no trace.
            let content = match read_text(relative, absolute) {
                Ok(content) => content,
                Err(warning) => {
                    warn!("{}", warning.message);
                    run.skip(warning);
                    return Ok(());
                }
            };

            write_record(&mut *writer, relative, &content).map_err(BundleError::write)?;
            run.tracker.record_written(content.len() as u64);
            debug!(path = %relative.display(), bytes = content.len(), "Included");
            Ok(())
        })?;

        Ok(run.finish())
    }

    /// Walk the tree top-down and hand every included file to `visit`.
    fn walk<F>(
        &self,
        config: &BundleConfig,
        root: &Path,
        filter: &InclusionFilter,
        run: &mut Run,
        mut visit: F,
    ) -> Result<(), BundleError>
    where
        F: FnMut(&mut Run, &Path, &Path) -> Result<(), BundleError>,
    {
        if filter.is_excluded_dir(Path::new(""), root) {
            warn!(root = %root.display(), "Root directory is excluded, nothing to bundle");
            return Ok(());
        }

        let prune_filter = Arc::new(filter.clone());
        let prune_root: Arc<Path> = Arc::from(root);

        let walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(config.follow_symlinks)
            .sort(config.sort_entries)
            .process_read_dir(move |_depth, _dir, _state, children| {
                // Drop excluded directories before jwalk descends into them.
                children.retain(|child| match child {
                    Ok(entry) if entry.file_type.is_dir() => {
                        let absolute = entry.parent_path.join(&entry.file_name);
                        let relative = absolute
                            .strip_prefix(&prune_root)
                            .unwrap_or(absolute.as_path());
                        let excluded = prune_filter.is_excluded_dir(relative, &absolute);
                        if excluded {
                            debug!(path = %relative.display(), "Pruning excluded directory");
                        }
                        !excluded
                    }
                    _ => true,
                });
            });

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    warn!("Could not read directory entry {}: {err}", path.display());
                    let relative = path
                        .strip_prefix(root)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|_| path.clone());
                    run.skip(SkipWarning::new(relative, err.to_string(), SkipKind::WalkError));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                run.tracker.record_dir();
                continue;
            }

            let absolute = entry.path();
            if !file_type.is_file() && !file_type.is_symlink() {
                continue;
            }
            // Unfollowed directory links are not files; dangling links still
            // go through the filter so a failed read gets reported.
            if file_type.is_symlink() && absolute.is_dir() {
                continue;
            }

            let relative = absolute
                .strip_prefix(root)
                .unwrap_or(absolute.as_path())
                .to_path_buf();
            let seen = run.tracker.record_seen(relative.clone());

            match filter.decide(&relative, &absolute) {
                Decision::Include => visit(run, &relative, &absolute)?,
                Decision::ScriptFile => {
                    info!("Skipping script file: {}", relative.display());
                    run.skip(SkipWarning::script_file(relative.clone()));
                }
                Decision::OutputFile => {
                    info!("Skipping output file: {}", relative.display());
                    run.skip(SkipWarning::output_file(relative.clone()));
                }
                Decision::ExcludedDir | Decision::ExtensionNotAllowed => {
                    debug!(path = %relative.display(), "Skipping due to rules");
                    run.report.files_filtered += 1;
                }
            }

            if seen % PROGRESS_INTERVAL == 0 {
                let _ = self.progress_tx.send(run.tracker.snapshot());
            }
        }

        let snapshot = run.tracker.snapshot();
        debug!(
            files = snapshot.files_seen,
            rate = format!("{:.0} files/s", snapshot.files_per_second()),
            "Walk finished"
        );
        let _ = self.progress_tx.send(snapshot);
        Ok(())
    }
}

impl Default for Bundler {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one run while walking.
struct Run {
    tracker: ProgressTracker,
    report: BundleReport,
}

impl Run {
    fn new(root: PathBuf) -> Self {
        Self {
            tracker: ProgressTracker::new(),
            report: BundleReport::new(root),
        }
    }

    fn skip(&mut self, warning: SkipWarning) {
        self.tracker.record_skip();
        self.report.warnings.push(warning);
    }

    fn finish(mut self) -> BundleReport {
        self.report.files_written = self.tracker.files_written();
        self.report.bytes_written = self.tracker.bytes_written();
        self.report.duration = self.tracker.elapsed();
        self.report
    }
}

/// Canonicalize the root and check that it is a directory.
fn resolve_root(root: &Path) -> Result<PathBuf, BundleError> {
    let root_path = root.canonicalize().map_err(|e| BundleError::io(root, e))?;
    if !root_path.is_dir() {
        return Err(BundleError::NotADirectory { path: root_path });
    }
    Ok(root_path)
}

/// Absolute output path, whether or not the file exists yet.
fn resolve_output(output: &Path) -> Option<PathBuf> {
    output
        .canonicalize()
        .or_else(|_| std::path::absolute(output))
        .ok()
}

fn read_text(relative: &Path, absolute: &Path) -> Result<String, SkipWarning> {
    let bytes = std::fs::read(absolute).map_err(|e| SkipWarning::read_error(relative, &e))?;
    String::from_utf8(bytes).map_err(|e| SkipWarning::not_utf8(relative, &e))
}
