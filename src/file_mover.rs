/// Single-entry move/rename primitive with undo logging.
///
/// This module performs one filesystem relocation at a time: it creates the
/// destination's parent directories as needed, renames the entry in place
/// (same-volume assumption), and records the move in the undo log only after
/// the rename has succeeded. Failed moves are never logged.
use std::fs;
use std::path::{Path, PathBuf};

use crate::undo_log::{LogError, MoveRecord, UndoLog};

/// Errors that can occur while moving a single entry.
#[derive(Debug)]
pub enum MoveError {
    /// The source no longer exists at call time.
    SourceMissing { path: PathBuf },
    /// An entry already exists at the destination; moves never overwrite.
    DestinationExists { path: PathBuf },
    /// Failed to create the destination's parent directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The rename itself failed (permissions, cross-device, ...).
    RenameFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// The move succeeded but could not be recorded in the undo log.
    LogFailed(LogError),
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing { path } => {
                write!(f, "Source no longer exists: {}", path.display())
            }
            Self::DestinationExists { path } => {
                write!(f, "Destination already exists: {}", path.display())
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::RenameFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::LogFailed(e) => {
                write!(f, "Moved, but failed to record undo entry: {}", e)
            }
        }
    }
}

impl std::error::Error for MoveError {}

impl From<LogError> for MoveError {
    fn from(e: LogError) -> Self {
        Self::LogFailed(e)
    }
}

/// Result type for move operations.
pub type MoveResult<T> = Result<T, MoveError>;

/// Moves single filesystem entries and records them for undo.
pub struct FileMover;

impl FileMover {
    /// Moves `source` to `destination`, recording the move in `log`.
    ///
    /// Parent directories of the destination are created recursively first.
    /// The undo record is appended only after the rename succeeds, so the
    /// log never claims a move that did not happen. Collisions are rejected
    /// rather than overwritten.
    ///
    /// Paths containing the log's separator sequence are rejected before any
    /// filesystem change, since the resulting record could not be replayed.
    pub fn move_entry(
        source: &Path,
        destination: &Path,
        log: &UndoLog,
    ) -> MoveResult<MoveRecord> {
        for path in [source, destination] {
            if path.to_string_lossy().contains(crate::undo_log::SEPARATOR) {
                return Err(MoveError::LogFailed(LogError::SeparatorInPath {
                    path: path.to_path_buf(),
                }));
            }
        }

        if !source.exists() {
            return Err(MoveError::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        if destination.exists() {
            return Err(MoveError::DestinationExists {
                path: destination.to_path_buf(),
            });
        }

        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| MoveError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::rename(source, destination).map_err(|e| MoveError::RenameFailed {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_error: e,
        })?;

        log.append(destination, source)?;

        Ok(MoveRecord {
            destination: destination.to_path_buf(),
            source: source.to_path_buf(),
        })
    }
}
