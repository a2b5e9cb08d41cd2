/// Core file organization pipeline.
///
/// This module owns the per-run orchestration: scanning the source directory,
/// classifying each file, and executing the terminal action for it (move,
/// delete, or skip) with conflict-safe renaming and bookkeeping. Every
/// per-file failure is caught here, logged, and counted; one file's error
/// never stops the processing of the files after it.
use crate::config::{CompiledExcludes, OrganizerConfig};
use crate::file_category::CategoryTable;
use crate::op_logger::OperationLogger;
use std::fs;
use std::path::{Path, PathBuf};

/// Largest numeric suffix probed by [`resolve_unique`] before giving up.
pub const MAX_CONFLICT_SUFFIX: u32 = 9999;

/// Errors that can occur during file organization operations.
///
/// All of these are file-local: the organizer logs and counts them, then
/// moves on to the next file.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source directory could not be read at all.
    ScanFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// Failed to delete a file, or the target was missing or not a file.
    DeleteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a file's metadata during scanning.
    MetadataFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Every candidate name up to the suffix ceiling was taken.
    TooManyConflicts { path: PathBuf },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScanFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(f, "Failed to create directory {}: {}", path.display(), source)
            }
            Self::MoveFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::DeleteFailed { path, source } => {
                write!(f, "Failed to delete {}: {}", path.display(), source)
            }
            Self::MetadataFailed { path, source } => {
                write!(f, "Failed to read metadata of {}: {}", path.display(), source)
            }
            Self::TooManyConflicts { path } => {
                write!(
                    f,
                    "Too many conflicting names for {} (gave up after {})",
                    path.display(),
                    MAX_CONFLICT_SUFFIX
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Produces a destination path that does not currently exist.
///
/// Returns `desired` unchanged when it is free. Otherwise probes
/// `stem_1<suffix>`, `stem_2<suffix>`, … in the same directory and returns
/// the first unused name. The filesystem is probed at call time, immediately
/// before the move, to keep the race window small.
///
/// Fails with [`OrganizeError::TooManyConflicts`] once the counter passes
/// [`MAX_CONFLICT_SUFFIX`], so a pathological directory bounds the loop
/// instead of hanging it.
pub fn resolve_unique(desired: &Path) -> OrganizeResult<PathBuf> {
    if !desired.exists() {
        return Ok(desired.to_path_buf());
    }

    let stem = desired
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = desired
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = desired.parent().unwrap_or_else(|| Path::new(""));

    for counter in 1..=MAX_CONFLICT_SUFFIX {
        let candidate = parent.join(format!("{}_{}{}", stem, counter, suffix));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(OrganizeError::TooManyConflicts {
        path: desired.to_path_buf(),
    })
}

/// Formats a byte count for display, e.g. `1536` -> `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} PB", size)
}

/// One file queued for organization.
///
/// Created during scanning and owned by the orchestration loop for the
/// duration of the run. The category is the only field that changes after
/// scanning: a manual selection in interactive mode overwrites it before the
/// move.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    /// Full path of the file in the source directory.
    pub path: PathBuf,
    /// Resolved category label (destination subfolder name).
    pub category: String,
    /// File size in bytes at scan time.
    pub size: u64,
}

impl FileDescriptor {
    /// File name for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lower-cased extension, empty for extension-less files.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Human-readable file size.
    pub fn size_formatted(&self) -> String {
        format_size(self.size)
    }
}

/// Running operation counters for one run.
///
/// Monotonically non-decreasing; reset only when the organizer is built.
/// Once every scanned file has received its terminal action,
/// `total == moved + deleted + skipped + errors` (`renamed` counts a subset
/// of the moves, not an additional terminal state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounters {
    pub total: usize,
    pub moved: usize,
    pub renamed: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Terminal action chosen for one file in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// Move to the descriptor's suggested category.
    Move,
    /// Move to a manually chosen category.
    MoveTo(String),
    /// Delete the file. Confirmation happens in the provider; a declined
    /// confirmation arrives as `Skip` instead.
    Delete,
    /// Leave the file where it is, with a reason for the log.
    Skip(String),
    /// Stop the run; files not yet processed keep their state.
    Abort,
}

/// What actually happened to a file, reported back to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Moved(PathBuf),
    Deleted,
    Skipped,
    /// The operation failed; the error is already logged and counted.
    Failed,
}

/// Strategy interface for the interactive driver.
///
/// The organizer calls [`decide`](ActionProvider::decide) once per file, in
/// scan order, and [`observe`](ActionProvider::observe) after executing the
/// chosen action, so a presentation layer can render the result without the
/// organizer knowing anything about terminals.
pub trait ActionProvider {
    /// Choose the action for one file. `index` is 1-based.
    fn decide(&mut self, descriptor: &FileDescriptor, index: usize, total: usize) -> FileAction;

    /// Called after each terminal action.
    fn observe(&mut self, _descriptor: &FileDescriptor, _outcome: &ActionOutcome) {}
}

/// Orchestrates one organization run over a source directory.
pub struct FileOrganizer {
    config: OrganizerConfig,
    table: CategoryTable,
    excludes: CompiledExcludes,
    logger: OperationLogger,
    counters: OperationCounters,
}

impl FileOrganizer {
    /// Creates an organizer with fresh counters.
    pub fn new(
        config: OrganizerConfig,
        table: CategoryTable,
        excludes: CompiledExcludes,
        logger: OperationLogger,
    ) -> Self {
        Self {
            config,
            table,
            excludes,
            logger,
            counters: OperationCounters::default(),
        }
    }

    /// Current counters, by value.
    pub fn counters(&self) -> OperationCounters {
        self.counters
    }

    /// The configuration this run operates under.
    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Path of this run's log file.
    pub fn log_path(&self) -> &Path {
        self.logger.path()
    }

    /// Writes the summary block to the run log.
    pub fn write_log_summary(&mut self) {
        self.logger.log_summary(&self.counters);
    }

    /// Scans the source directory for files to organize.
    ///
    /// Lists direct children only. Directories, non-regular files, and
    /// anything the exclusion rules reject are left out. Each survivor gets a
    /// descriptor with its classified category and size. A file whose
    /// metadata cannot be read is logged as an error, counted, and excluded;
    /// the scan itself only fails if the directory cannot be read at all.
    ///
    /// The `total` counter is advanced here for every candidate file, so it
    /// also covers files that errored before receiving a descriptor.
    pub fn scan(&mut self) -> OrganizeResult<Vec<FileDescriptor>> {
        let entries = fs::read_dir(&self.config.source_dir).map_err(|e| OrganizeError::ScanFailed {
            path: self.config.source_dir.clone(),
            source: e,
        })?;

        let mut descriptors = Vec::new();

        for entry in entries.flatten() {
            let path = entry.path();

            if !self.excludes.should_process(&path) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if !meta.is_file() => continue,
                Ok(meta) => {
                    self.counters.total += 1;
                    let category = self.table.classify(&path).to_string();
                    descriptors.push(FileDescriptor {
                        path,
                        category,
                        size: meta.len(),
                    });
                }
                Err(e) => {
                    self.counters.total += 1;
                    self.counters.errors += 1;
                    let err = OrganizeError::MetadataFailed {
                        path: path.clone(),
                        source: e,
                    };
                    self.logger.log_error(&path, &err);
                }
            }
        }

        descriptors.sort_by_key(|d| d.name());
        Ok(descriptors)
    }

    /// Moves a file into its category folder under the destination base.
    ///
    /// Creates the category directory if absent. A conflicting destination
    /// name is resolved to a unique one, logged as RENAMED before the MOVED
    /// entry. The move itself is a single `fs::rename`.
    ///
    /// Returns the final path on success. On failure the error is already
    /// logged and counted, and `None` is returned — deliberately not a
    /// `Result`, so callers cannot `?`-propagate one file's failure out of
    /// the batch loop.
    pub fn move_file(&mut self, descriptor: &FileDescriptor) -> Option<PathBuf> {
        match self.try_move(descriptor) {
            Ok(destination) => {
                self.counters.moved += 1;
                Some(destination)
            }
            Err(err) => {
                self.logger.log_error(&descriptor.path, &err);
                self.counters.errors += 1;
                None
            }
        }
    }

    fn try_move(&mut self, descriptor: &FileDescriptor) -> OrganizeResult<PathBuf> {
        let category_dir = self.config.destination_base.join(&descriptor.category);
        fs::create_dir_all(&category_dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: category_dir.clone(),
            source: e,
        })?;

        let file_name = descriptor.path.file_name().ok_or_else(|| OrganizeError::MoveFailed {
            from: descriptor.path.clone(),
            to: category_dir.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;

        let mut destination = category_dir.join(file_name);

        if destination.exists() {
            let resolved = resolve_unique(&destination)?;
            self.logger.log_rename(&destination, &resolved, "name conflict");
            // Counted at resolution time: a failing rename afterwards leaves
            // `renamed` bumped but not `moved`.
            self.counters.renamed += 1;
            destination = resolved;
        }

        fs::rename(&descriptor.path, &destination).map_err(|e| OrganizeError::MoveFailed {
            from: descriptor.path.clone(),
            to: destination.clone(),
            source: e,
        })?;

        self.logger
            .log_move(&descriptor.path, &destination, &descriptor.category);
        Ok(destination)
    }

    /// Deletes a file.
    ///
    /// The target must still exist and be a regular file; anything else is a
    /// failure, not a silent success. Returns false on failure, with the
    /// error already logged and counted.
    pub fn delete_file(&mut self, descriptor: &FileDescriptor) -> bool {
        match self.try_delete(descriptor) {
            Ok(()) => {
                self.logger.log_delete(&descriptor.path, "user request");
                self.counters.deleted += 1;
                true
            }
            Err(err) => {
                self.logger.log_error(&descriptor.path, &err);
                self.counters.errors += 1;
                false
            }
        }
    }

    fn try_delete(&self, descriptor: &FileDescriptor) -> OrganizeResult<()> {
        let meta = fs::metadata(&descriptor.path).map_err(|e| OrganizeError::DeleteFailed {
            path: descriptor.path.clone(),
            source: e,
        })?;

        if !meta.is_file() {
            return Err(OrganizeError::DeleteFailed {
                path: descriptor.path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a regular file",
                ),
            });
        }

        fs::remove_file(&descriptor.path).map_err(|e| OrganizeError::DeleteFailed {
            path: descriptor.path.clone(),
            source: e,
        })
    }

    /// Leaves a file untouched and records why.
    pub fn skip_file(&mut self, descriptor: &FileDescriptor, reason: &str) {
        self.logger.log_skip(&descriptor.path, reason);
        self.counters.skipped += 1;
    }

    /// Moves every descriptor in scan order, continuing past failures.
    ///
    /// `on_file` is called after each file with the move result; the driver
    /// uses it to advance a progress bar.
    pub fn run_automatic<F>(&mut self, descriptors: &[FileDescriptor], mut on_file: F)
    where
        F: FnMut(&FileDescriptor, bool),
    {
        for descriptor in descriptors {
            let moved = self.move_file(descriptor).is_some();
            on_file(descriptor, moved);
        }
    }

    /// Processes descriptors one at a time, asking the provider for each
    /// file's action.
    ///
    /// A `MoveTo` overwrites the descriptor's category before the move.
    /// Returns false when the provider aborted the run; counters then cover
    /// only the files processed so far.
    pub fn run_interactive(
        &mut self,
        mut descriptors: Vec<FileDescriptor>,
        provider: &mut dyn ActionProvider,
    ) -> bool {
        let total = descriptors.len();

        for (index, descriptor) in descriptors.iter_mut().enumerate() {
            match provider.decide(descriptor, index + 1, total) {
                FileAction::Move => {
                    let outcome = match self.move_file(descriptor) {
                        Some(destination) => ActionOutcome::Moved(destination),
                        None => ActionOutcome::Failed,
                    };
                    provider.observe(descriptor, &outcome);
                }
                FileAction::MoveTo(category) => {
                    descriptor.category = category;
                    let outcome = match self.move_file(descriptor) {
                        Some(destination) => ActionOutcome::Moved(destination),
                        None => ActionOutcome::Failed,
                    };
                    provider.observe(descriptor, &outcome);
                }
                FileAction::Delete => {
                    let outcome = if self.delete_file(descriptor) {
                        ActionOutcome::Deleted
                    } else {
                        ActionOutcome::Failed
                    };
                    provider.observe(descriptor, &outcome);
                }
                FileAction::Skip(reason) => {
                    self.skip_file(descriptor, &reason);
                    provider.observe(descriptor, &ActionOutcome::Skipped);
                }
                FileAction::Abort => return false,
            }
        }

        true
    }
}
