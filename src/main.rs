//! codebundle - Flatten a source tree into one annotated text file.
//!
//! Usage:
//!   codebundle [ROOT] [-o OUTPUT]   Bundle ROOT into OUTPUT
//!   codebundle list [ROOT]          Show the files that would be bundled
//!   codebundle defaults             Print the default configuration as JSON
//!   codebundle --help               Show help

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use codebundle_core::{BundleConfig, BundleError};
use codebundle_scan::{BundleEntry, BundleReport, Bundler};

/// Output filename used by the command line when `-o` is not given.
const DEFAULT_CLI_OUTPUT: &str = "project_code_bundle.txt";

#[derive(Parser)]
#[command(
    name = "codebundle",
    version,
    about = "Flatten a source tree into one annotated text file",
    long_about = "codebundle walks a directory, keeps the source files whose extension is \
                  on its allow-list, skips dependency and build directories, and writes \
                  every file under a `### File: <path> ###` header into one text file."
)]
struct Cli {
    /// Directory to bundle (defaults to current directory)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Output file, relative to the current directory
    #[arg(short, long, global = true, default_value = DEFAULT_CLI_OUTPUT)]
    output: PathBuf,

    /// Visit entries in name order for a reproducible bundle
    #[arg(long)]
    sort: bool,

    /// Descend into symlinked directories
    #[arg(long)]
    follow_symlinks: bool,

    /// Summary format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Log every included and filtered file
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the files that would be bundled without writing anything
    List {
        /// Directory to inspect
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Visit entries in name order
        #[arg(long)]
        sort: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the default configuration as JSON
    Defaults,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Command::List { root, sort, format }) => {
            run_list(root, &cli.output, sort, format)?;
        }
        Some(Command::Defaults) => {
            let config = BundleConfig::new(".", DEFAULT_CLI_OUTPUT);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => {
            let config = BundleConfig::builder()
                .root(cli.root)
                .output(cli.output)
                .sort_entries(cli.sort)
                .follow_symlinks(cli.follow_symlinks)
                .build()
                .map_err(BundleError::from)?;
            run_bundle(&config, cli.format)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. Flags win over `RUST_LOG`.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Bundle the tree and print a summary.
fn run_bundle(config: &BundleConfig, format: OutputFormat) -> Result<()> {
    let report = Bundler::new().bundle(config).context("Bundling failed")?;

    match format {
        OutputFormat::Text => print_summary(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Show what a bundle of `root` would contain.
fn run_list(root: PathBuf, output: &PathBuf, sort: bool, format: OutputFormat) -> Result<()> {
    let config = BundleConfig::builder()
        .root(root)
        .output(output.clone())
        .sort_entries(sort)
        .build()
        .map_err(BundleError::from)?;

    let entries = Bundler::new().collect(&config).context("Listing failed")?;

    match format {
        OutputFormat::Text => print_entries(&entries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }

    Ok(())
}

fn print_summary(report: &BundleReport) {
    let output = report
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    println!();
    println!("{}", "─".repeat(60));
    println!(" {} -> {}", report.root.display(), output);
    println!(
        " {} files bundled, {}",
        report.files_written,
        format_size(report.bytes_written)
    );
    println!(
        " {} skipped, {} filtered out",
        report.warnings.len(),
        report.files_filtered
    );
    println!(" Finished in {:.2}s", report.duration.as_secs_f64());
    println!("{}", "─".repeat(60));

    if report.has_read_failures() {
        println!();
        println!("Some files could not be read:");
        for warning in &report.warnings {
            println!("  {}", warning.message);
        }
    }
}

fn print_entries(entries: &[BundleEntry]) {
    let total: u64 = entries.iter().map(|e| e.size).sum();

    for entry in entries {
        println!("{:>10}  {}", format_size(entry.size), entry.relative.display());
    }
    println!();
    println!("{} files, {}", entries.len(), format_size(total));
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
