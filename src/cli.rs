//! Command dispatch for filesorter.
//!
//! This module turns a resolved user intent into work:
//! - rename/move: list the directory, plan with the matcher, then either
//!   preview the plan (dry-run) or apply it through the mover
//! - sort: analyze the directory, present suggestions, execute the choice
//! - undo: hand the log to the undo engine and report the outcome
//!
//! Per-item mutation failures are reported and never abort the batch.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::{self, DirectorySnapshot, Grouping};
use crate::config::{CompiledFilters, FilterConfig};
use crate::file_mover::FileMover;
use crate::matcher::{Matcher, PlannedMove};
use crate::output::OutputFormatter;
use crate::undo::{RestoreOutcome, UndoEngine, UndoStatus};
use crate::undo_log::UndoLog;

/// A resolved command against a target directory.
#[derive(Debug, Clone)]
pub enum Command {
    /// Rename matching files in place using back-reference substitution.
    Rename {
        pattern: String,
        replacement: String,
        dry_run: bool,
    },
    /// Move matching files into a folder (created on demand).
    Move {
        pattern: String,
        folder: String,
        dry_run: bool,
    },
    /// Analyze the directory and offer grouping suggestions interactively.
    Sort { dry_run: bool },
}

/// Runs a command against `directory`, using the default configuration
/// lookup.
pub fn run_cli(command: Command, directory: &Path, log: &UndoLog) -> Result<(), String> {
    run_cli_with_config(command, directory, log, None)
}

/// Runs a command against `directory` with an optional filter-config path.
pub fn run_cli_with_config(
    command: Command,
    directory: &Path,
    log: &UndoLog,
    config_path: Option<&Path>,
) -> Result<(), String> {
    if !directory.is_dir() {
        return Err(format!(
            "Directory '{}' does not exist.",
            directory.display()
        ));
    }

    let filters = load_filters(config_path, log)?;

    match command {
        Command::Rename {
            pattern,
            replacement,
            dry_run,
        } => {
            let matcher = Matcher::new(&pattern).map_err(|e| e.to_string())?;
            let names = list_filenames(directory, &filters)?;
            let plan = matcher.plan_rename(directory, &names, &replacement);
            apply_plan(&plan, log, dry_run);
            Ok(())
        }
        Command::Move {
            pattern,
            folder,
            dry_run,
        } => {
            let matcher = Matcher::new(&pattern).map_err(|e| e.to_string())?;
            let names = list_filenames(directory, &filters)?;
            let plan = matcher.plan_move(directory, &names, &folder);
            apply_plan(&plan, log, dry_run);
            Ok(())
        }
        Command::Sort { dry_run } => sort_interactive(directory, &filters, log, dry_run),
    }
}

/// Replays the undo log and reports what was restored, skipped, or failed.
pub fn run_undo(log: &UndoLog) -> Result<(), String> {
    match UndoEngine::undo(log).map_err(|e| e.to_string())? {
        UndoStatus::NoHistory => {
            OutputFormatter::plain("No undo history found.");
            Ok(())
        }
        UndoStatus::Completed(report) => {
            for (record, outcome) in &report.items {
                match outcome {
                    RestoreOutcome::Restored => OutputFormatter::success(&format!(
                        "Moved back: {} -> {}",
                        record.destination.display(),
                        record.source.display()
                    )),
                    RestoreOutcome::SkippedMissing => OutputFormatter::warning(&format!(
                        "Skipped (missing): {}",
                        record.destination.display()
                    )),
                    RestoreOutcome::SourceOccupied => OutputFormatter::error(&format!(
                        "Not restored, original location occupied: {}",
                        record.source.display()
                    )),
                    RestoreOutcome::Failed(reason) => OutputFormatter::error(&format!(
                        "Failed to restore {}: {}",
                        record.destination.display(),
                        reason
                    )),
                }
            }

            for dir in &report.removed_dirs {
                OutputFormatter::plain(&format!("Removed empty folder: {}", dir.display()));
            }

            OutputFormatter::plain(&format!(
                "Undo complete: {} restored, {} skipped, {} failed.",
                report.restored_count(),
                report.skipped_count(),
                report.failed_count()
            ));
            Ok(())
        }
    }
}

/// Loads and compiles the filter configuration, always excluding the undo
/// log file itself so the tool never tries to reorganize its own state.
fn load_filters(config_path: Option<&Path>, log: &UndoLog) -> Result<CompiledFilters, String> {
    let mut config = FilterConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    if let Some(name) = log.path().file_name() {
        config
            .filters
            .exclude
            .filenames
            .push(name.to_string_lossy().to_string());
    }

    config
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))
}

/// Lists the filenames of regular files in `directory` that pass the
/// filters, sorted for deterministic planning.
fn list_filenames(directory: &Path, filters: &CompiledFilters) -> Result<Vec<String>, String> {
    let entries = fs::read_dir(directory)
        .map_err(|e| format!("Error reading directory {}: {}", directory.display(), e))?;

    let mut names = Vec::new();
    for entry in entries.flatten() {
        if let Ok(file_type) = entry.file_type()
            && file_type.is_file()
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if filters.should_include(&name) {
                names.push(name);
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Applies (or previews) a plan, one move at a time.
///
/// Execution continues past individual failures; each item's outcome is
/// printed as it happens.
fn apply_plan(plan: &[PlannedMove], log: &UndoLog, dry_run: bool) {
    if plan.is_empty() {
        OutputFormatter::plain("No matching files.");
        return;
    }

    if dry_run {
        for item in plan {
            OutputFormatter::dry_run_notice(&format!(
                "Would move: {} -> {}",
                item.source.display(),
                item.destination.display()
            ));
        }
        OutputFormatter::plain(&format!(
            "Dry run complete. {} file(s) would be moved; nothing was changed.",
            plan.len()
        ));
        return;
    }

    let pb = OutputFormatter::create_progress_bar(plan.len() as u64);
    let mut failures = 0usize;

    for item in plan {
        match FileMover::move_entry(&item.source, &item.destination, log) {
            Ok(record) => {
                pb.println(format!(
                    "✓ Moved: {} -> {}",
                    record.source.display(),
                    record.destination.display()
                ));
            }
            Err(e) => {
                failures += 1;
                pb.println(format!("✗ {}", e));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if failures == 0 {
        OutputFormatter::success(&format!("Moved {} file(s).", plan.len()));
    } else {
        OutputFormatter::warning(&format!(
            "Moved {} file(s), {} failed. Failed items were not logged and will not be undone.",
            plan.len() - failures,
            failures
        ));
    }
    OutputFormatter::plain("Run with --undo to revert.");
}

/// The interactive `sort` action: analyze, suggest, execute the choice.
fn sort_interactive(
    directory: &Path,
    filters: &CompiledFilters,
    log: &UndoLog,
    dry_run: bool,
) -> Result<(), String> {
    let snapshot = DirectorySnapshot::scan(directory, filters)
        .map_err(|e| format!("Error analyzing directory {}: {}", directory.display(), e))?;

    let suggestions = analysis::suggestions(&snapshot);
    if suggestions.is_empty() {
        OutputFormatter::plain("No actionable patterns found.");
        return Ok(());
    }

    OutputFormatter::suggestion_menu(&suggestions);
    print!("Choose an option (number): ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| format!("Error reading input: {}", e))?;

    let choice: usize = match input.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            OutputFormatter::plain("Invalid input.");
            return Ok(());
        }
    };

    if choice == 0 {
        OutputFormatter::plain("No changes made.");
        return Ok(());
    }

    if choice == suggestions.len() + 1 {
        return run_undo(log);
    }

    let Some(selected) = suggestions.get(choice - 1) else {
        OutputFormatter::plain("Invalid input.");
        return Ok(());
    };

    let plan = match &selected.grouping {
        Grouping::Extension(ext) => snapshot.plan_by_extension(ext),
        Grouping::Year => snapshot.plan_by_year(),
    };
    apply_plan(&plan, log, dry_run);
    Ok(())
}
