/// Structured operation logging.
///
/// Every classify/move/rename/delete/skip/error event of a run is appended to
/// a plain-text log file created at session start, one line per event:
///
/// ```text
/// 2026-08-07 14:02:11 | INFO     | MOVED | Documents | report.pdf -> /home/u/Downloads/Documents/report.pdf
/// ```
///
/// The logger owns no business logic; it records what the organizer tells it.
/// A failing log write warns on stderr and never aborts the run.
use crate::file_organizer::{OperationCounters, OrganizeError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Kinds of logged file operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Moved,
    Renamed,
    Deleted,
    Skipped,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Moved => "MOVED",
            EventKind::Renamed => "RENAMED",
            EventKind::Deleted => "DELETED",
            EventKind::Skipped => "SKIPPED",
            EventKind::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appends operation events to a per-run log file.
///
/// The file is named with the session start timestamp, so each run gets its
/// own log. Lines are flushed as they are written.
pub struct OperationLogger {
    log_path: PathBuf,
    writer: BufWriter<File>,
    write_warned: bool,
}

impl OperationLogger {
    /// Creates the log directory if needed, opens a fresh timestamped log
    /// file, and writes the session-start banner.
    pub fn create(log_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("tidydown_{}.log", stamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let mut logger = Self {
            log_path,
            writer: BufWriter::new(file),
            write_warned: false,
        };
        logger.session_start();
        Ok(logger)
    }

    /// Path of the log file for this run.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    fn record(&mut self, level: &str, detail: &str) {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let result = writeln!(self.writer, "{} | {:<8} | {}", stamp, level, detail)
            .and_then(|_| self.writer.flush());

        if let Err(e) = result
            && !self.write_warned
        {
            eprintln!(
                "Warning: could not write to log file {}: {}",
                self.log_path.display(),
                e
            );
            self.write_warned = true;
        }
    }

    fn rule(&mut self) {
        self.record("INFO", &"=".repeat(60));
    }

    fn session_start(&mut self) {
        self.rule();
        self.record("INFO", "File organization session started");
        self.rule();
    }

    /// Records a successful move.
    pub fn log_move(&mut self, source: &Path, destination: &Path, category: &str) {
        let name = file_name(source);
        self.record(
            "INFO",
            &format!(
                "{} | {:<14} | {} -> {}",
                EventKind::Moved,
                category,
                name,
                destination.display()
            ),
        );
    }

    /// Records a conflict-resolving rename, logged before the actual move.
    pub fn log_rename(&mut self, original: &Path, renamed: &Path, reason: &str) {
        self.record(
            "INFO",
            &format!(
                "{} | {:<14} | {} -> {}",
                EventKind::Renamed,
                reason,
                file_name(original),
                file_name(renamed)
            ),
        );
    }

    /// Records a deletion.
    pub fn log_delete(&mut self, path: &Path, reason: &str) {
        self.record(
            "WARNING",
            &format!("{} | {:<14} | {}", EventKind::Deleted, reason, file_name(path)),
        );
    }

    /// Records a skipped file.
    pub fn log_skip(&mut self, path: &Path, reason: &str) {
        self.record(
            "INFO",
            &format!("{} | {:<14} | {}", EventKind::Skipped, reason, file_name(path)),
        );
    }

    /// Records a per-file failure.
    pub fn log_error(&mut self, path: &Path, error: &OrganizeError) {
        self.record(
            "ERROR",
            &format!("{} | {} | {}", EventKind::Error, file_name(path), error),
        );
    }

    /// Writes the end-of-run summary block.
    pub fn log_summary(&mut self, counters: &OperationCounters) {
        self.rule();
        self.record("INFO", "Session summary:");
        self.record("INFO", &format!("  Files processed: {}", counters.total));
        self.record("INFO", &format!("  Moved: {}", counters.moved));
        self.record("INFO", &format!("  Renamed: {}", counters.renamed));
        self.record("INFO", &format!("  Deleted: {}", counters.deleted));
        self.record("INFO", &format!("  Skipped: {}", counters.skipped));
        self.record("INFO", &format!("  Errors: {}", counters.errors));
        self.rule();
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
