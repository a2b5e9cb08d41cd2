//! Command-line driver.
//!
//! Owns everything presentation-side: argument parsing, the mode menu, the
//! per-file interactive prompts, and the final summary rendering. The actual
//! file handling lives in [`crate::file_organizer`]; this module only decides
//! what to ask the organizer to do and shows the results.

use crate::config::{CompiledExcludes, ConfigError, OrganizerConfig, Settings};
use crate::file_category::CategoryTable;
use crate::file_organizer::{
    ActionOutcome, ActionProvider, FileAction, FileDescriptor, FileOrganizer,
};
use crate::op_logger::OperationLogger;
use crate::output::OutputFormatter;
use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "tidydown",
    version,
    about = "Sort a folder's files into category subdirectories"
)]
pub struct Cli {
    /// Directory to organize (default: the platform Downloads folder)
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Organize every file automatically, without per-file prompts
    #[arg(long, conflicts_with = "interactive")]
    pub auto: bool,

    /// Review each file individually
    #[arg(short, long)]
    pub interactive: bool,

    /// Path to a settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print full error details on failure
    #[arg(long)]
    pub debug: bool,
}

/// Organization mode for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Automatic,
    Interactive,
}

/// Runs the application and returns the process exit code.
///
/// Exit code 0 covers normal completion and every form of user cancellation;
/// 1 is reserved for configuration errors and other fatal failures before or
/// during setup.
pub fn run(args: &Cli) -> i32 {
    match try_run(args) {
        Ok(()) => 0,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            if args.debug {
                eprintln!("{:?}", e);
            }
            1
        }
    }
}

fn try_run(args: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(args.config.as_deref())?;
    let excludes = CompiledExcludes::compile(&settings.exclude)?;
    let config = OrganizerConfig::resolve(args.source.clone(), &settings)?;
    config.validate()?;

    OutputFormatter::banner();
    OutputFormatter::config_table(&config);

    let Some(mode) = resolve_mode(args) else {
        OutputFormatter::info("Quitting.");
        return Ok(());
    };

    let logger = OperationLogger::create(&config.log_dir).map_err(|e| {
        ConfigError::LogDirUnavailable {
            path: config.log_dir.clone(),
            reason: e.to_string(),
        }
    })?;

    let table = CategoryTable::builtin();
    let labels = table.labels();
    let mut organizer = FileOrganizer::new(config, table, excludes, logger);

    let descriptors = organizer.scan()?;

    if descriptors.is_empty() {
        OutputFormatter::warning("No files found to organize.");
        organizer.write_log_summary();
        return Ok(());
    }

    OutputFormatter::preview_table(&descriptors);

    let completed = match mode {
        Mode::Automatic => run_automatic_mode(&mut organizer, &descriptors),
        Mode::Interactive => run_interactive_mode(&mut organizer, descriptors, labels),
    };

    if !completed {
        println!();
        OutputFormatter::warning("Run cancelled; counters cover the files processed so far.");
    }

    organizer.write_log_summary();
    OutputFormatter::summary_table(&organizer.counters());
    println!();
    println!(
        "{}",
        format!("Log file: {}", organizer.log_path().display()).dimmed()
    );

    Ok(())
}

fn resolve_mode(args: &Cli) -> Option<Mode> {
    if args.auto {
        return Some(Mode::Automatic);
    }
    if args.interactive {
        return Some(Mode::Interactive);
    }
    select_mode()
}

/// Mode menu shown when neither `--auto` nor `--interactive` was given.
fn select_mode() -> Option<Mode> {
    OutputFormatter::header("Select mode");
    OutputFormatter::plain("  [1] Automatic   - organize all files automatically");
    OutputFormatter::plain("  [2] Interactive - review each file individually");
    OutputFormatter::plain("  (q to quit)");

    loop {
        let input = prompt("Mode")?;
        match input.trim() {
            "1" | "" => return Some(Mode::Automatic),
            "2" => return Some(Mode::Interactive),
            "q" | "Q" => return None,
            _ => continue,
        }
    }
}

/// Blanket confirmation, then a progress bar over the whole batch.
fn run_automatic_mode(organizer: &mut FileOrganizer, descriptors: &[FileDescriptor]) -> bool {
    println!();
    if !prompt_confirm("Proceed with automatic organization?", Some(false)) {
        return false;
    }

    let pb = OutputFormatter::create_progress_bar(descriptors.len() as u64);
    pb.set_message("Organizing files...");
    organizer.run_automatic(descriptors, |_, _| pb.inc(1));
    pb.finish_with_message("done");

    true
}

fn run_interactive_mode(
    organizer: &mut FileOrganizer,
    descriptors: Vec<FileDescriptor>,
    labels: Vec<String>,
) -> bool {
    OutputFormatter::header("Interactive mode");
    OutputFormatter::plain("For each file, choose an action:");
    OutputFormatter::plain("  [a] Auto   - move to the suggested category");
    OutputFormatter::plain("  [m] Manual - choose the category yourself");
    OutputFormatter::plain("  [d] Delete - remove the file");
    OutputFormatter::plain("  [s] Skip   - leave the file as is");
    OutputFormatter::plain("  [q] Quit   - stop the run");

    let mut provider = ConsoleProvider { labels };
    organizer.run_interactive(descriptors, &mut provider)
}

/// Interactive strategy backed by stdin prompts.
struct ConsoleProvider {
    labels: Vec<String>,
}

impl ConsoleProvider {
    fn prompt_category(&self) -> Option<String> {
        OutputFormatter::plain("Available categories:");
        for (i, label) in self.labels.iter().enumerate() {
            println!("  [{}] {}", i + 1, label);
        }

        loop {
            let input = prompt("Category number (b to go back)")?;
            let input = input.trim();
            if input.eq_ignore_ascii_case("b") {
                return None;
            }
            if let Ok(n) = input.parse::<usize>()
                && (1..=self.labels.len()).contains(&n)
            {
                return Some(self.labels[n - 1].clone());
            }
        }
    }
}

impl ActionProvider for ConsoleProvider {
    fn decide(&mut self, descriptor: &FileDescriptor, index: usize, total: usize) -> FileAction {
        println!();
        OutputFormatter::plain(&format!("File {}/{}", index, total));
        println!("  {}", descriptor.name().bold());
        println!("  Category: {}", descriptor.category.cyan());
        println!("  Size:     {}", descriptor.size_formatted().yellow());

        loop {
            let Some(input) = prompt("Action [a/m/d/s/q]") else {
                return FileAction::Abort;
            };
            match input.trim().to_lowercase().as_str() {
                "a" | "" => return FileAction::Move,
                "m" => {
                    // Backing out of the category list returns to this menu.
                    if let Some(category) = self.prompt_category() {
                        return FileAction::MoveTo(category);
                    }
                }
                "d" => {
                    return if prompt_confirm("Delete this file?", Some(false)) {
                        FileAction::Delete
                    } else {
                        FileAction::Skip("delete cancelled".to_string())
                    };
                }
                "s" => return FileAction::Skip("user choice".to_string()),
                "q" => return FileAction::Abort,
                _ => continue,
            }
        }
    }

    fn observe(&mut self, descriptor: &FileDescriptor, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Moved(_) => {
                OutputFormatter::success(&format!("Moved to {}/", descriptor.category));
            }
            ActionOutcome::Deleted => OutputFormatter::success("Deleted"),
            ActionOutcome::Skipped => OutputFormatter::warning("Skipped"),
            ActionOutcome::Failed => OutputFormatter::error("Failed; see the log for details"),
        }
    }
}

/// Reads one line from stdin. Returns `None` on EOF or a read error, which
/// callers treat as cancellation.
fn prompt(message: &str) -> Option<String> {
    print!("{}: ", message);
    let _ = io::stdout().flush();

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input),
        Err(_) => None,
    }
}

/// Yes/no prompt with an optional default answer. EOF answers no.
fn prompt_confirm(message: &str, default: Option<bool>) -> bool {
    let suffix = match default {
        Some(true) => "(Y/n)",
        Some(false) | None => "(y/N)",
    };

    loop {
        let Some(input) = prompt(&format!("{} {}", message, suffix)) else {
            return false;
        };
        match input.trim().to_uppercase().as_str() {
            "Y" | "YES" => return true,
            "N" | "NO" => return false,
            "" => {
                if let Some(default) = default {
                    return default;
                }
            }
            _ => continue,
        }
    }
}
