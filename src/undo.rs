/// Undo engine for reverting recorded file moves.
///
/// Consumes the entire undo log in one pass: each recorded move is reversed
/// best-effort in file order, directories left empty by the reversal are
/// removed, and the log file is deleted once cleanup completes.
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::undo_log::{LogError, MoveRecord, UndoLog};

/// Outcome of reversing one recorded move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The entry was moved back to its original location.
    Restored,
    /// Nothing exists at the recorded destination; the record was skipped.
    SkippedMissing,
    /// An unrelated entry now occupies the original location; the record was
    /// not reversed to avoid overwriting it.
    SourceOccupied,
    /// The reversal rename itself failed.
    Failed(String),
}

/// Per-item account of what an undo run did.
#[derive(Debug)]
pub struct UndoReport {
    /// Every record from the log, oldest first, paired with its outcome.
    pub items: Vec<(MoveRecord, RestoreOutcome)>,
    /// Directories removed because the reversal left them empty.
    pub removed_dirs: Vec<PathBuf>,
}

impl UndoReport {
    /// Number of records successfully reversed.
    pub fn restored_count(&self) -> usize {
        self.count(|o| matches!(o, RestoreOutcome::Restored))
    }

    /// Number of records skipped because nothing existed at the destination.
    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, RestoreOutcome::SkippedMissing))
    }

    /// Number of records that could not be reversed.
    pub fn failed_count(&self) -> usize {
        self.count(|o| {
            matches!(o, RestoreOutcome::SourceOccupied | RestoreOutcome::Failed(_))
        })
    }

    /// Returns true if every record was reversed.
    pub fn is_complete_success(&self) -> bool {
        self.restored_count() == self.items.len()
    }

    fn count(&self, pred: impl Fn(&RestoreOutcome) -> bool) -> usize {
        self.items.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Result of invoking the undo engine.
#[derive(Debug)]
pub enum UndoStatus {
    /// No log file exists; there is nothing to undo. This is the expected
    /// steady state, not an error.
    NoHistory,
    /// The log was replayed and deleted.
    Completed(UndoReport),
}

/// Replays and clears the undo log.
pub struct UndoEngine;

impl UndoEngine {
    /// Reverses every move recorded in `log`, removes directories left empty
    /// by the reversal, and deletes the log file.
    ///
    /// Records are replayed in file order (oldest first). Individual
    /// reversals are isolated: a missing destination is skipped, an occupied
    /// original location or a failed rename is reported per item, and none of
    /// these aborts the remaining records. The log file is deleted
    /// unconditionally once cleanup completes, however many items were
    /// skipped or failed — a consumed log is the terminal state of every
    /// undo run.
    pub fn undo(log: &UndoLog) -> Result<UndoStatus, LogError> {
        if !log.exists() {
            return Ok(UndoStatus::NoHistory);
        }

        let records = log.read_all()?;

        // Parent directories of logged destinations are candidates for
        // cleanup. BTreeSet keeps the removal order deterministic.
        let mut candidate_dirs: BTreeSet<PathBuf> = BTreeSet::new();
        let mut items = Vec::with_capacity(records.len());

        for record in records {
            if let Some(parent) = record.destination.parent()
                && !parent.as_os_str().is_empty()
            {
                candidate_dirs.insert(parent.to_path_buf());
            }

            let outcome = Self::restore(&record);
            items.push((record, outcome));
        }

        // Cleanup happens strictly after all reversals so a directory still
        // holding a not-yet-reversed sibling is never considered.
        let mut removed_dirs = Vec::new();
        for dir in candidate_dirs {
            if dir.is_dir()
                && let Ok(mut entries) = fs::read_dir(&dir)
                && entries.next().is_none()
                && fs::remove_dir(&dir).is_ok()
            {
                removed_dirs.push(dir);
            }
        }

        log.clear()?;

        Ok(UndoStatus::Completed(UndoReport {
            items,
            removed_dirs,
        }))
    }

    /// Reverses one record: moves the entry at `destination` back to
    /// `source`, if it is still there and the way back is clear.
    fn restore(record: &MoveRecord) -> RestoreOutcome {
        if !record.destination.exists() {
            return RestoreOutcome::SkippedMissing;
        }

        if record.source.exists() {
            return RestoreOutcome::SourceOccupied;
        }

        match fs::rename(&record.destination, &record.source) {
            Ok(()) => RestoreOutcome::Restored,
            Err(e) => RestoreOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_mover::FileMover;
    use tempfile::TempDir;

    fn log_in(dir: &TempDir) -> UndoLog {
        UndoLog::new(dir.path().join("undo_log.txt"))
    }

    fn completed(status: UndoStatus) -> UndoReport {
        match status {
            UndoStatus::Completed(report) => report,
            UndoStatus::NoHistory => panic!("expected a completed undo"),
        }
    }

    #[test]
    fn test_undo_without_log_reports_no_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = log_in(&temp_dir);

        let status = UndoEngine::undo(&log).expect("undo failed");
        assert!(matches!(status, UndoStatus::NoHistory));
    }

    #[test]
    fn test_undo_restores_moved_files_and_removes_empty_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = log_in(&temp_dir);
        let base = temp_dir.path();

        let a = base.join("a.txt");
        let b = base.join("b.txt");
        fs::write(&a, "a").expect("write failed");
        fs::write(&b, "b").expect("write failed");

        let folder = base.join("text");
        FileMover::move_entry(&a, &folder.join("a.txt"), &log).expect("move failed");
        FileMover::move_entry(&b, &folder.join("b.txt"), &log).expect("move failed");

        let report = completed(UndoEngine::undo(&log).expect("undo failed"));

        assert_eq!(report.restored_count(), 2);
        assert!(report.is_complete_success());
        assert!(a.exists());
        assert!(b.exists());
        assert!(!folder.exists(), "emptied folder should be removed");
        assert_eq!(report.removed_dirs, vec![folder]);
        assert!(!log.exists(), "log must be deleted after undo");
    }

    #[test]
    fn test_undo_preserves_dir_with_unrelated_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = log_in(&temp_dir);
        let base = temp_dir.path();

        let a = base.join("a.txt");
        fs::write(&a, "a").expect("write failed");

        let folder = base.join("text");
        FileMover::move_entry(&a, &folder.join("a.txt"), &log).expect("move failed");

        // An unrelated file lands in the folder before the undo.
        fs::write(folder.join("stray.txt"), "stray").expect("write failed");

        let report = completed(UndoEngine::undo(&log).expect("undo failed"));

        assert!(report.is_complete_success());
        assert!(a.exists());
        assert!(folder.exists(), "non-empty folder must be preserved");
        assert!(folder.join("stray.txt").exists());
        assert!(report.removed_dirs.is_empty());
    }

    #[test]
    fn test_undo_skips_missing_entries_but_still_clears_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = log_in(&temp_dir);
        let base = temp_dir.path();

        let a = base.join("a.txt");
        fs::write(&a, "a").expect("write failed");

        let moved = base.join("text").join("a.txt");
        FileMover::move_entry(&a, &moved, &log).expect("move failed");

        // Simulate external deletion of the moved file.
        fs::remove_file(&moved).expect("remove failed");

        let report = completed(UndoEngine::undo(&log).expect("undo failed"));

        assert_eq!(report.restored_count(), 0);
        assert_eq!(report.skipped_count(), 1);
        assert!(!log.exists(), "log is consumed even when items are skipped");
    }

    #[test]
    fn test_undo_refuses_to_overwrite_occupied_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = log_in(&temp_dir);
        let base = temp_dir.path();

        let a = base.join("a.txt");
        fs::write(&a, "original").expect("write failed");

        let moved = base.join("text").join("a.txt");
        FileMover::move_entry(&a, &moved, &log).expect("move failed");

        // A new file appears at the original location.
        fs::write(&a, "newcomer").expect("write failed");

        let report = completed(UndoEngine::undo(&log).expect("undo failed"));

        assert_eq!(report.failed_count(), 1);
        assert!(matches!(report.items[0].1, RestoreOutcome::SourceOccupied));

        // Neither file was clobbered.
        assert_eq!(fs::read_to_string(&a).expect("read failed"), "newcomer");
        assert_eq!(fs::read_to_string(&moved).expect("read failed"), "original");
        assert!(!log.exists());
    }

    #[test]
    fn test_undo_replays_in_file_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = log_in(&temp_dir);
        let base = temp_dir.path();

        // A re-entrant chain: a moved to b, then b moved to c. In file order
        // the first record finds nothing at b (it moved on) and is skipped;
        // the second restores c back to b. A single undo run is strictly one
        // pass over the log, so the chain unwinds by exactly one step.
        let a = base.join("a.txt");
        fs::write(&a, "chain").expect("write failed");
        FileMover::move_entry(&a, &base.join("b.txt"), &log).expect("move failed");
        FileMover::move_entry(&base.join("b.txt"), &base.join("c.txt"), &log)
            .expect("move failed");

        let report = completed(UndoEngine::undo(&log).expect("undo failed"));

        assert_eq!(report.items[0].1, RestoreOutcome::SkippedMissing);
        assert_eq!(report.items[1].1, RestoreOutcome::Restored);
        assert!(base.join("b.txt").exists());
        assert!(!base.join("c.txt").exists());
    }

    #[test]
    fn test_undo_tolerates_stray_log_lines() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log = log_in(&temp_dir);
        let base = temp_dir.path();

        let a = base.join("a.txt");
        fs::write(&a, "a").expect("write failed");
        FileMover::move_entry(&a, &base.join("text").join("a.txt"), &log)
            .expect("move failed");

        // Stray content appended by something else.
        use std::io::Write;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(log.path())
            .expect("open failed");
        writeln!(file, "not a record").expect("write failed");

        let report = completed(UndoEngine::undo(&log).expect("undo failed"));
        assert_eq!(report.items.len(), 1);
        assert!(report.is_complete_success());
        assert!(a.exists());
    }
}
