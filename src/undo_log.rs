/// Persistent undo log for file move operations.
///
/// Every successful move is appended here as one plain-text line in the form
/// `destination -> source`, so the log always trails filesystem state: a
/// record exists only for moves that actually happened. The log is held
/// behind an explicit handle rather than an ambient constant path, so tests
/// and callers can scope it wherever they like.
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Separator between destination and source in a log line.
///
/// Paths containing this literal sequence cannot be represented and are
/// rejected at append time.
pub const SEPARATOR: &str = " -> ";

/// Default log file name, created in the process working directory.
pub const DEFAULT_LOG_FILE: &str = "undo_log.txt";

/// A single logged move: the entry at `source` was relocated to
/// `destination`. Reversal is a straight swap of the two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Where the entry ended up.
    pub destination: PathBuf,
    /// Where the entry came from.
    pub source: PathBuf,
}

/// Errors that can occur while reading or writing the undo log.
#[derive(Debug)]
pub enum LogError {
    /// Failed to open, read, write, or delete the log file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A path contains the literal record separator and cannot be encoded.
    SeparatorInPath { path: PathBuf },
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Undo log I/O error on {}: {}", path.display(), source)
            }
            Self::SeparatorInPath { path } => {
                write!(
                    f,
                    "Path {} contains the reserved separator '{}' and cannot be logged",
                    path.display(),
                    SEPARATOR
                )
            }
        }
    }
}

impl std::error::Error for LogError {}

/// Handle to the append-only undo log file.
///
/// The file is created on first append, grows monotonically across
/// invocations, and is deleted in full by one undo run. No locking is
/// performed; overlapping writers are outside the supported model.
#[derive(Debug, Clone)]
pub struct UndoLog {
    path: PathBuf,
}

impl UndoLog {
    /// Creates a handle for a log at the given path. Nothing is touched on
    /// disk until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a handle for the default log in the working directory.
    pub fn in_working_dir() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }

    /// Returns the path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the log file currently exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Appends one record, creating the file if absent.
    ///
    /// Rejects paths containing the separator sequence: such a line could
    /// not be re-parsed without misattributing fields.
    pub fn append(&self, destination: &Path, source: &Path) -> Result<(), LogError> {
        for path in [destination, source] {
            if path.to_string_lossy().contains(SEPARATOR) {
                return Err(LogError::SeparatorInPath {
                    path: path.to_path_buf(),
                });
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LogError::Io {
                path: self.path.clone(),
                source: e,
            })?;

        writeln!(
            file,
            "{}{}{}",
            destination.display(),
            SEPARATOR,
            source.display()
        )
        .map_err(|e| LogError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Reads every record in file order (oldest first).
    ///
    /// Lines without the separator are skipped silently: they are treated as
    /// stray content, not a fatal corruption.
    pub fn read_all(&self) -> Result<Vec<MoveRecord>, LogError> {
        let content = fs::read_to_string(&self.path).map_err(|e| LogError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let records = content
            .lines()
            .filter_map(|line| {
                line.split_once(SEPARATOR).map(|(dest, src)| MoveRecord {
                    destination: PathBuf::from(dest),
                    source: PathBuf::from(src),
                })
            })
            .collect();

        Ok(records)
    }

    /// Deletes the log file. Idempotent when the file is already absent.
    pub fn clear(&self) -> Result<(), LogError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LogError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}
