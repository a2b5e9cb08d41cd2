//! Output formatting and styling.
//!
//! Centralizes all terminal output: colored status lines, the banner, the
//! configuration and summary tables, the category preview, and the progress
//! bar used in automatic mode. Keeping this here means the organizer core
//! never touches a terminal.

use crate::config::OrganizerConfig;
use crate::file_organizer::{FileDescriptor, OperationCounters};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Manages CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the application banner.
    pub fn banner() {
        println!("{}", "tidydown".bold().cyan());
        println!("{}", "Sort a folder's files into category subdirectories".dimmed());
        println!();
    }

    /// Prints the resolved configuration.
    pub fn config_table(config: &OrganizerConfig) {
        Self::header("Configuration");
        println!("  {:<18} {}", "Source:", config.source_dir.display());
        println!("  {:<18} {}", "Destination base:", config.destination_base.display());
        println!("  {:<18} {}", "Log directory:", config.log_dir.display());
    }

    /// Prints the scanned files grouped by category.
    pub fn preview_table(descriptors: &[FileDescriptor]) {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for descriptor in descriptors {
            *counts.entry(descriptor.category.as_str()).or_insert(0) += 1;
        }

        Self::header(&format!("Found {} files", descriptors.len()));
        for (category, count) in &counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!("  {:<16} {} {}", category, count.to_string().magenta(), file_word);
        }
    }

    /// Prints the end-of-run counters.
    pub fn summary_table(counters: &OperationCounters) {
        Self::header("Summary");
        println!("  {:<22} {}", "Total files:", counters.total);
        println!("  {:<22} {}", "Moved:", counters.moved.to_string().green());
        println!(
            "  {:<22} {}",
            "Renamed (conflicts):",
            counters.renamed.to_string().yellow()
        );
        println!("  {:<22} {}", "Deleted:", counters.deleted.to_string().red());
        println!("  {:<22} {}", "Skipped:", counters.skipped.to_string().dimmed());
        println!("  {:<22} {}", "Errors:", counters.errors.to_string().red());
    }

    /// Creates the progress bar used while organizing in automatic mode.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }
}
