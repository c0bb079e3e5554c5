//! filesorter - reorganize files in a directory by filename pattern
//!
//! This library plans and applies rename/move operations selected by regex
//! patterns, records every successful move in an append-only undo log, and
//! can replay that log to restore the directory to its previous state. It
//! also analyzes directories to suggest groupings by extension or by year.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod file_mover;
pub mod matcher;
pub mod output;
pub mod undo;
pub mod undo_log;

pub use analysis::{DirectorySnapshot, Grouping, Suggestion, SuggestionProvider};
pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use file_mover::{FileMover, MoveError};
pub use matcher::{Matcher, PatternError, PlannedMove};
pub use undo::{RestoreOutcome, UndoEngine, UndoReport, UndoStatus};
pub use undo_log::{MoveRecord, UndoLog};

pub use cli::{Command, run_cli, run_cli_with_config, run_undo};
