use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use filesorter::cli::{Command, run_cli_with_config, run_undo};
use filesorter::undo_log::UndoLog;

#[derive(Parser, Debug)]
#[command(
    name = "filesorter",
    version,
    about = "Organize files in a directory using regex patterns and filename metadata"
)]
struct Args {
    /// Target directory to process
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Action to perform on files
    #[arg(short, long, value_enum)]
    action: Option<Action>,

    /// Regex pattern to match filenames
    #[arg(short = 'r', long)]
    regex: Option<String>,

    /// Replacement string (rename) or target folder name (move)
    #[arg(short = 'p', long)]
    replace: Option<String>,

    /// Preview changes without making them
    #[arg(long)]
    dry_run: bool,

    /// Undo the last action
    #[arg(long)]
    undo: bool,

    /// Path to a filter configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Action {
    /// Analyze the directory and suggest groupings interactively
    Sort,
    /// Rename matching files using back-reference substitution
    Rename,
    /// Move matching files into a folder
    Move,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log = UndoLog::in_working_dir();

    if args.undo {
        return match run_undo(&log) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let Some(directory) = args.directory else {
        eprintln!("A target directory is required. Use --directory <PATH>.");
        return ExitCode::FAILURE;
    };

    let Some(action) = args.action else {
        eprintln!("An action is required. Use --action <sort|rename|move>.");
        return ExitCode::FAILURE;
    };

    let command = match action {
        Action::Sort => Command::Sort {
            dry_run: args.dry_run,
        },
        Action::Rename => {
            let (Some(pattern), Some(replacement)) = (args.regex, args.replace) else {
                eprintln!("Both --regex and --replace are required for renaming.");
                return ExitCode::FAILURE;
            };
            Command::Rename {
                pattern,
                replacement,
                dry_run: args.dry_run,
            }
        }
        Action::Move => {
            let (Some(pattern), Some(folder)) = (args.regex, args.replace) else {
                eprintln!("Both --regex and --replace are required for moving.");
                return ExitCode::FAILURE;
            };
            Command::Move {
                pattern,
                folder,
                dry_run: args.dry_run,
            }
        }
    };

    match run_cli_with_config(command, &directory, &log, args.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
