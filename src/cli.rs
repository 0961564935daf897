//! Command-line interface module for comictidy.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Organization orchestration
//! - Console reporting and the JSON run report

use crate::cleanup::NameError;
use crate::file_organizer::{
    FileOrganizer, OrganizeError, OrganizeResult, Operation, RunObserver, RunReport,
};
use crate::filesystem::{Filesystem, LocalFs};
use crate::output::OutputFormatter;
use clap::Parser;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::info;

/// Sort comic and e-book files into per-series directories.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "comictidy",
    version,
    about = "Sort comic and e-book files into per-series directories",
    long_about = "Moves every .cbr, .cbz, .pdf, .epub, .rar and .azw3 file found directly in \
                  DIRECTORY into a subdirectory named after its series, renamed to \
                  'Series – Vol N.ext'. Files whose destination already exists are left alone."
)]
pub struct Args {
    /// Directory containing the files to organize.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Show what would be moved without touching any file.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the run report as JSON instead of console messages.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    /// The run could not start.
    pub const FATAL: u8 = 1;
    /// Some files were malformed or could not be moved.
    pub const INCOMPLETE: u8 = 2;
}

/// Runs the CLI application with the parsed arguments.
///
/// # Arguments
///
/// * `args` - Parsed command-line arguments
///
/// # Returns
///
/// The run report, or an error if the directory could not be organized at
/// all. Per-file problems are recorded in the report instead.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use comictidy::cli::{Args, run_cli};
///
/// let args = Args::parse_from(["comictidy", "/path/to/comics", "--dry-run"]);
/// match run_cli(&args) {
///     Ok(report) => println!("{} files planned", report.operations.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(args: &Args) -> OrganizeResult<RunReport> {
    let report = if args.json {
        let report = organize_directory(&LocalFs, &args.directory, args.dry_run, &mut ())?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        report
    } else {
        organize_directory_with_console(&LocalFs, &args.directory, args.dry_run)?
    };

    info!(
        moved = report.operations.len(),
        conflicts = report.conflicts.len(),
        malformed = report.malformed.len(),
        failures = report.failures.len(),
        ignored = report.ignored,
        dry_run = report.dry_run,
        "run finished"
    );
    Ok(report)
}

/// Organizes `base_path`, reporting progress to `observer` only.
///
/// # Arguments
///
/// * `fs` - Filesystem to read and move files through
/// * `base_path` - Directory whose top-level files are organized
/// * `dry_run` - Plan the moves without touching any file
/// * `observer` - Receives each file's outcome as it is processed
pub fn organize_directory(
    fs: &dyn Filesystem,
    base_path: &Path,
    dry_run: bool,
    observer: &mut dyn RunObserver,
) -> OrganizeResult<RunReport> {
    let mut organizer = FileOrganizer::new(fs, base_path)?;
    organizer.organize_directory(dry_run, observer)
}

/// Organizes `base_path`, printing one line per file and a summary.
///
/// # Returns
///
/// The same report as [`organize_directory`], after it has been printed.
pub fn organize_directory_with_console(
    fs: &dyn Filesystem,
    base_path: &Path,
    dry_run: bool,
) -> OrganizeResult<RunReport> {
    if dry_run {
        OutputFormatter::info(&format!(
            "DRY RUN: Analyzing contents of: {}",
            base_path.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));
    }

    let mut console = ConsoleObserver::new(base_path, dry_run);
    let report = organize_directory(fs, base_path, dry_run, &mut console)?;
    console.finish();

    print_summary(&report);
    Ok(report)
}

/// Prints each outcome as it happens, above a progress bar.
struct ConsoleObserver<'a> {
    base_path: &'a Path,
    dry_run: bool,
    progress: ProgressBar,
}

impl<'a> ConsoleObserver<'a> {
    fn new(base_path: &'a Path, dry_run: bool) -> Self {
        Self {
            base_path,
            dry_run,
            progress: ProgressBar::hidden(),
        }
    }

    fn finish(&self) {
        self.progress.finish_and_clear();
    }

    /// Shows `path` relative to the directory being organized.
    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(self.base_path)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    fn print_outcome(&self, file_name: &str, outcome: &OrganizeResult<Operation>) {
        match outcome {
            Ok(operation) => {
                let movement = format!("'{}' → '{}'", file_name, self.relative(&operation.new_path));
                if self.dry_run {
                    OutputFormatter::dry_run_notice(&format!("Would move {}", movement));
                } else {
                    OutputFormatter::success(&format!("Moved {}", movement));
                }
            }
            // Non-comic files are expected next to comics; say nothing.
            Err(OrganizeError::Name(NameError::UnrecognizedExtension { .. })) => {}
            Err(OrganizeError::Name(NameError::MalformedName { reason, .. })) => {
                OutputFormatter::warning(&format!("Skipping (no match): {} ({})", file_name, reason));
            }
            Err(OrganizeError::DestinationConflict { destination, .. }) => {
                OutputFormatter::warning(&format!(
                    "Destination exists, skipping: {}",
                    self.relative(destination)
                ));
            }
            Err(e) => OutputFormatter::error(&format!("{}: {}", file_name, e)),
        }
    }
}

impl RunObserver for ConsoleObserver<'_> {
    fn started(&mut self, total: usize) {
        self.progress = OutputFormatter::create_progress_bar(total as u64);
    }

    fn processed(&mut self, file_name: &str, outcome: &OrganizeResult<Operation>) {
        self.progress.inc(1);
        self.progress
            .suspend(|| self.print_outcome(file_name, outcome));
    }
}

fn print_summary(report: &RunReport) {
    if report.operations.is_empty()
        && report.conflicts.is_empty()
        && !report.has_failures()
    {
        OutputFormatter::info("No comic files found to organize.");
        return;
    }

    if !report.operations.is_empty() {
        OutputFormatter::summary_table(&report.series_counts(), report.operations.len());
    }

    if !report.conflicts.is_empty() {
        OutputFormatter::warning(&format!(
            "{} file(s) left in place because the destination already exists.",
            report.conflicts.len()
        ));
    }

    if report.has_failures() {
        OutputFormatter::error("Some files could not be organized. Please review errors above.");
    }

    if report.dry_run {
        println!("\n✓ Dry run complete. No files were modified.");
        println!(
            "Run 'comictidy {}' (without --dry-run) to execute the organization.",
            report.base_path.display()
        );
    } else {
        OutputFormatter::success("Organization complete!");
    }
}
