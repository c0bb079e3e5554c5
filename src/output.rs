//! Output formatting and styling module.
//!
//! Centralizes all CLI output: colored status lines, dry-run notices,
//! progress bars for large batches, and the numbered suggestion menu.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::Suggestion;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, to stderr.
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

    /// Prints a dry-run notice in yellow.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Progress bar for batch move operations.
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

    /// Prints the numbered suggestion menu, followed by the undo and skip
    /// options the prompt accepts.
    pub fn suggestion_menu(suggestions: &[Suggestion]) {
        Self::header("Here are some suggestions to reorganize your directory:");
        for (idx, suggestion) in suggestions.iter().enumerate() {
            println!("{}. {}", idx + 1, suggestion.description);
        }
        println!("{}. Undo last action", suggestions.len() + 1);
        println!("0. Skip (make no changes)");
    }
}
