/// Moves comic files into per-series directories.
///
/// This module plans and performs the move for each file in a base
/// directory: parse the filename, compute the destination, skip it if the
/// destination is taken, otherwise create the series directory and rename
/// the file into it. Every outcome is recorded in a [`RunReport`].
use crate::cleanup::NameError;
use crate::comic_name::ComicName;
use crate::filesystem::Filesystem;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Represents a single move performed (or planned) during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// The original path of the file before organization.
    pub original_path: PathBuf,
    /// The new path of the file after organization.
    pub new_path: PathBuf,
    /// The series directory the file was moved to.
    pub series: String,
    /// Canonical volume number, if the name carried one.
    pub volume: Option<String>,
}

/// A file left in place because its destination was already taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub original_path: PathBuf,
    pub destination: PathBuf,
}

/// A file that could not be moved for filesystem reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything that happened during one organization run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// The directory that was organized.
    pub base_path: PathBuf,
    /// Whether this run only planned its moves.
    pub dry_run: bool,
    /// Moves performed, or planned in a dry run.
    pub operations: Vec<Operation>,
    pub conflicts: Vec<Conflict>,
    /// Filenames with a comic extension but no usable title.
    pub malformed: Vec<String>,
    pub failures: Vec<Failure>,
    /// Number of non-comic files that were skipped.
    pub ignored: usize,
}

impl RunReport {
    /// Creates an empty report for a run over `base_path`.
    pub fn new(base_path: PathBuf, dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            base_path,
            dry_run,
            operations: Vec::new(),
            conflicts: Vec::new(),
            malformed: Vec::new(),
            failures: Vec::new(),
            ignored: 0,
        }
    }

    /// Number of files moved (or planned) per series, sorted by series.
    pub fn series_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for operation in &self.operations {
            *counts.entry(operation.series.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// True if any file was malformed or hit a filesystem error.
    ///
    /// Conflicts do not count, since every re-run over an organized
    /// directory produces them.
    pub fn has_failures(&self) -> bool {
        !self.malformed.is_empty() || !self.failures.is_empty()
    }

    fn record(&mut self, outcome: &OrganizeResult<Operation>) {
        match outcome {
            Ok(operation) => self.operations.push(operation.clone()),
            Err(OrganizeError::Name(NameError::UnrecognizedExtension { .. })) => self.ignored += 1,
            Err(OrganizeError::Name(NameError::MalformedName { file_name, .. })) => {
                self.malformed.push(file_name.clone())
            }
            Err(OrganizeError::DestinationConflict {
                original_path,
                destination,
            }) => self.conflicts.push(Conflict {
                original_path: original_path.clone(),
                destination: destination.clone(),
            }),
            Err(error) => self.failures.push(Failure {
                path: error.path().to_path_buf(),
                reason: error.to_string(),
            }),
        }
    }
}

/// Errors that can occur while organizing a directory.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The base directory doesn't exist.
    #[error("Invalid base path {}: directory does not exist", .path.display())]
    InvalidBasePath { path: PathBuf },
    /// The base directory could not be listed.
    #[error("Error reading directory {}: {source}", .path.display())]
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// The filename is not a comic, or no title could be parsed from it.
    #[error(transparent)]
    Name(#[from] NameError),
    /// Something already occupies the destination path.
    #[error("Destination exists, skipping: {}", .destination.display())]
    DestinationConflict {
        original_path: PathBuf,
        destination: PathBuf,
    },
    /// Failed to create a series directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file into its series directory.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// The report could not be serialized.
    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

impl OrganizeError {
    /// The path this error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidBasePath { path }
            | Self::ReadDirFailed { path, .. }
            | Self::DirectoryCreationFailed { path, .. } => path.as_path(),
            Self::DestinationConflict { original_path, .. } => original_path.as_path(),
            Self::FileMoveFailure { from, .. } => from.as_path(),
            Self::Name(_) | Self::Report(_) => Path::new(""),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A move that has been checked but not yet performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub name: ComicName,
    pub source: PathBuf,
    pub series_dir: PathBuf,
    pub destination: PathBuf,
}

impl PlannedMove {
    fn operation(&self) -> Operation {
        Operation {
            original_path: self.source.clone(),
            new_path: self.destination.clone(),
            series: self.name.series().to_string(),
            volume: self.name.volume().map(|volume| volume.to_string()),
        }
    }
}

/// Receives progress from [`FileOrganizer::organize_directory`].
///
/// Both methods default to doing nothing, and `()` is a silent observer.
pub trait RunObserver {
    /// Called once with the number of files about to be processed.
    fn started(&mut self, _total: usize) {}

    /// Called after each file with the name it had and what happened to it.
    fn processed(&mut self, _file_name: &str, _outcome: &OrganizeResult<Operation>) {}
}

impl RunObserver for () {}

/// Organizes comic files in one base directory into series subdirectories.
///
/// Destinations claimed earlier in the same run are remembered, so two
/// files that resolve to the same name conflict even in a dry run where
/// nothing is written to disk.
pub struct FileOrganizer<'a> {
    fs: &'a dyn Filesystem,
    base_path: &'a Path,
    claimed: HashSet<PathBuf>,
}

impl<'a> FileOrganizer<'a> {
    /// Creates an organizer for `base_path`, which must exist.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use comictidy::file_organizer::FileOrganizer;
    /// use comictidy::filesystem::LocalFs;
    /// use std::path::Path;
    ///
    /// let mut organizer = FileOrganizer::new(&LocalFs, Path::new("/path/to/comics")).unwrap();
    /// match organizer.organize_file("Bleach v5.epub", false) {
    ///     Ok(op) => println!("Moved {} to {}", op.original_path.display(), op.new_path.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn new(fs: &'a dyn Filesystem, base_path: &'a Path) -> OrganizeResult<Self> {
        if !fs.exists(base_path) {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
            });
        }

        Ok(Self {
            fs,
            base_path,
            claimed: HashSet::new(),
        })
    }

    /// Works out where `file_name` should go without touching the disk.
    ///
    /// Fails with [`OrganizeError::Name`] if the name can't be parsed and
    /// with [`OrganizeError::DestinationConflict`] if the destination exists
    /// or another file in this run already claimed it.
    pub fn plan(&self, file_name: &str) -> OrganizeResult<PlannedMove> {
        let name = ComicName::parse(file_name)?;
        let source = self.base_path.join(file_name);
        let series_dir = self.base_path.join(name.dir_name());
        let destination = name.destination(self.base_path);

        if self.claimed.contains(&destination) || self.fs.exists(&destination) {
            return Err(OrganizeError::DestinationConflict {
                original_path: source,
                destination,
            });
        }

        Ok(PlannedMove {
            name,
            source,
            series_dir,
            destination,
        })
    }

    /// Creates the series directory if needed and moves the file.
    pub fn apply(&self, plan: &PlannedMove) -> OrganizeResult<Operation> {
        self.fs
            .create_dir_all(&plan.series_dir)
            .map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: plan.series_dir.clone(),
                source: e,
            })?;

        self.fs
            .move_file(&plan.source, &plan.destination)
            .map_err(|e| OrganizeError::FileMoveFailure {
                from: plan.source.clone(),
                to: plan.destination.clone(),
                source: e,
            })?;

        Ok(plan.operation())
    }

    /// Plans and, unless `dry_run` is set, performs the move for one file.
    ///
    /// A successful destination is claimed for the rest of the run.
    pub fn organize_file(&mut self, file_name: &str, dry_run: bool) -> OrganizeResult<Operation> {
        let plan = self.plan(file_name)?;
        debug!(
            file = file_name,
            series = plan.name.series(),
            volume = ?plan.name.volume().map(|volume| volume.as_str()),
            "parsed comic name"
        );

        let operation = if dry_run {
            plan.operation()
        } else {
            self.apply(&plan)?
        };
        self.claimed.insert(operation.new_path.clone());
        Ok(operation)
    }

    /// Organizes every regular file directly inside the base directory.
    ///
    /// The listing is taken once up front, in sorted order. Each file is
    /// handled independently: an error for one file is recorded and the run
    /// moves on to the next.
    pub fn organize_directory(
        &mut self,
        dry_run: bool,
        observer: &mut dyn RunObserver,
    ) -> OrganizeResult<RunReport> {
        let names =
            self.fs
                .list_files(self.base_path)
                .map_err(|e| OrganizeError::ReadDirFailed {
                    path: self.base_path.to_path_buf(),
                    source: e,
                })?;

        let mut report = RunReport::new(self.base_path.to_path_buf(), dry_run);
        observer.started(names.len());

        for name in names {
            let Some(file_name) = name.to_str() else {
                debug!(file = ?name, "skipping file with a non UTF-8 name");
                report.ignored += 1;
                continue;
            };

            let outcome = self.organize_file(file_name, dry_run);
            if let Err(OrganizeError::Name(NameError::UnrecognizedExtension { .. })) = &outcome {
                debug!(file = file_name, "not a comic file, ignoring");
            }
            report.record(&outcome);
            observer.processed(file_name, &outcome);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::LocalFs;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    /// Local disk, except that directory creation always fails.
    struct ReadOnlyDirs;

    impl Filesystem for ReadOnlyDirs {
        fn list_files(&self, dir: &Path) -> io::Result<Vec<OsString>> {
            LocalFs.list_files(dir)
        }

        fn exists(&self, path: &Path) -> bool {
            LocalFs.exists(path)
        }

        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            ))
        }

        fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
            LocalFs.move_file(from, to)
        }
    }

    /// Records which files the observer saw.
    #[derive(Default)]
    struct Recorder {
        total: Option<usize>,
        seen: Vec<String>,
    }

    impl RunObserver for Recorder {
        fn started(&mut self, total: usize) {
            self.total = Some(total);
        }

        fn processed(&mut self, file_name: &str, _outcome: &OrganizeResult<Operation>) {
            self.seen.push(file_name.to_string());
        }
    }

    #[test]
    fn test_organize_file_creates_series_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("Bleach v5.epub"), "content").expect("Failed to write file");

        let mut organizer = FileOrganizer::new(&LocalFs, base_path).expect("Base path is valid");
        let operation = organizer
            .organize_file("Bleach v5.epub", false)
            .expect("Failed to move file");

        assert_eq!(operation.series, "Bleach");
        assert_eq!(operation.volume.as_deref(), Some("5"));
        assert_eq!(operation.new_path, base_path.join("Bleach").join("Bleach – Vol 5.epub"));
        assert!(base_path.join("Bleach").is_dir());
        assert!(operation.new_path.exists());
        assert!(!base_path.join("Bleach v5.epub").exists());
    }

    #[test]
    fn test_organize_file_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("One Piece")).expect("Failed to create directory");
        fs::write(base_path.join("One Piece.pdf"), "content").expect("Failed to write file");

        let mut organizer = FileOrganizer::new(&LocalFs, base_path).expect("Base path is valid");
        organizer
            .organize_file("One Piece.pdf", false)
            .expect("Failed to move file");

        assert!(base_path.join("One Piece").join("One Piece.pdf").exists());
    }

    #[test]
    fn test_existing_destination_is_a_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Legend")).expect("Failed to create directory");
        fs::write(base_path.join("Legend").join("Legend – Vol 1.cbr"), "old")
            .expect("Failed to write file");
        fs::write(base_path.join("Legend T01.cbr"), "new").expect("Failed to write file");

        let mut organizer = FileOrganizer::new(&LocalFs, base_path).expect("Base path is valid");
        let result = organizer.organize_file("Legend T01.cbr", false);

        assert!(matches!(result, Err(OrganizeError::DestinationConflict { .. })));
        assert!(base_path.join("Legend T01.cbr").exists());
        let kept = fs::read_to_string(base_path.join("Legend").join("Legend – Vol 1.cbr"))
            .expect("Failed to read file");
        assert_eq!(kept, "old");
    }

    #[test]
    fn test_dry_run_claims_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("Legend T01.cbr"), "a").expect("Failed to write file");
        fs::write(base_path.join("Legend v1.cbr"), "b").expect("Failed to write file");

        let mut organizer = FileOrganizer::new(&LocalFs, base_path).expect("Base path is valid");
        organizer
            .organize_file("Legend T01.cbr", true)
            .expect("First plan should succeed");
        let second = organizer.organize_file("Legend v1.cbr", true);

        assert!(matches!(second, Err(OrganizeError::DestinationConflict { .. })));
        assert!(!base_path.join("Legend").exists());
    }

    #[test]
    fn test_directory_failure_leaves_file_in_place() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("Saga v1.cbz"), "content").expect("Failed to write file");

        let mut organizer =
            FileOrganizer::new(&ReadOnlyDirs, base_path).expect("Base path is valid");
        let result = organizer.organize_file("Saga v1.cbz", false);

        assert!(matches!(result, Err(OrganizeError::DirectoryCreationFailed { .. })));
        assert!(base_path.join("Saga v1.cbz").exists());
    }

    #[test]
    fn test_failure_does_not_stop_the_run() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("Saga v1.cbz"), "content").expect("Failed to write file");
        fs::write(base_path.join("Saga v2.cbz"), "content").expect("Failed to write file");

        let mut organizer =
            FileOrganizer::new(&ReadOnlyDirs, base_path).expect("Base path is valid");
        let report = organizer
            .organize_directory(false, &mut ())
            .expect("Run should complete");

        assert_eq!(report.failures.len(), 2);
        assert!(report.has_failures());
        assert!(report.failures[0].reason.contains("read-only filesystem"));
    }

    #[test]
    fn test_organize_directory_reports_every_outcome() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        for name in ["Legend T01.cbr", "Legend v1.cbr", "notes.txt", " .cbz", "Akira.pdf"] {
            fs::write(base_path.join(name), "content").expect("Failed to write file");
        }

        let mut organizer = FileOrganizer::new(&LocalFs, base_path).expect("Base path is valid");
        let mut recorder = Recorder::default();
        let report = organizer
            .organize_directory(false, &mut recorder)
            .expect("Run should complete");

        assert_eq!(recorder.total, Some(5));
        assert_eq!(recorder.seen.len(), 5);
        assert_eq!(report.operations.len(), 2);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.malformed, vec![" .cbz".to_string()]);
        assert_eq!(report.ignored, 1);
        assert!(report.failures.is_empty());
        assert!(report.has_failures());

        let counts = report.series_counts();
        assert_eq!(counts.get("Legend"), Some(&1));
        assert_eq!(counts.get("Akira"), Some(&1));
    }

    #[test]
    fn test_invalid_base_path() {
        let result = FileOrganizer::new(&LocalFs, Path::new("/non/existent/path"));
        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut report = RunReport::new(PathBuf::from("/comics"), true);
        report.operations.push(Operation {
            original_path: PathBuf::from("/comics/Bleach v5.epub"),
            new_path: PathBuf::from("/comics/Bleach/Bleach – Vol 5.epub"),
            series: "Bleach".to_string(),
            volume: Some("5".to_string()),
        });

        let json = serde_json::to_value(&report).expect("Report should serialize");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["operations"][0]["series"], "Bleach");
        assert_eq!(json["operations"][0]["volume"], "5");
        assert_eq!(json["ignored"], 0);
    }
}
