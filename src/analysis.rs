/// Directory analysis and reorganization suggestions.
///
/// Builds a transient snapshot of a directory (filename, extension, year)
/// and derives non-binding suggestions from it: group files by extension, or
/// by the year found in their names. Nothing here mutates the filesystem;
/// the executable counterparts of the suggestions are plain move plans.
use chrono::{DateTime, Datelike, Local};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::CompiledFilters;
use crate::matcher::PlannedMove;

/// Extension group used for files whose name has no `.` segment.
pub const NO_EXTENSION: &str = "no_extension";

/// One file in a snapshot, with the metadata extracted from its name.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// The filename (not the full path).
    pub name: String,
    /// The segment after the last `.` in the name, if any.
    pub extension: Option<String>,
    /// Four-digit year from a `YYYY-MM-DD` match in the name, falling back
    /// to the file's modification time.
    pub year: String,
}

impl FileEntry {
    /// Grouping key for extension-based suggestions.
    pub fn extension_key(&self) -> &str {
        self.extension.as_deref().unwrap_or(NO_EXTENSION)
    }
}

/// Transient listing of a directory's files, built fresh per analysis call
/// and never cached across invocations. Entries are sorted by name so output
/// and plans are deterministic regardless of OS listing order.
#[derive(Debug)]
pub struct DirectorySnapshot {
    pub directory: PathBuf,
    pub entries: Vec<FileEntry>,
}

impl DirectorySnapshot {
    /// Scans `directory`, keeping regular files that pass `filters`.
    pub fn scan(directory: &Path, filters: &CompiledFilters) -> io::Result<Self> {
        // Compiled once per scan; the pattern itself is fixed.
        let date_pattern = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid literal pattern");

        let mut entries = Vec::new();
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if !filters.should_include(&name) {
                continue;
            }

            let extension = name
                .rsplit_once('.')
                .filter(|(stem, _)| !stem.is_empty())
                .map(|(_, ext)| ext.to_string());

            let year = match date_pattern.captures(&name) {
                Some(caps) => caps[1].to_string(),
                None => modification_year(&entry.path())?,
            };

            entries.push(FileEntry {
                name,
                extension,
                year,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            directory: directory.to_path_buf(),
            entries,
        })
    }

    /// Plans moving every file with the given extension group into a folder
    /// named after it, e.g. all `pdf` files into `pdf/`.
    pub fn plan_by_extension(&self, extension: &str) -> Vec<PlannedMove> {
        let target_dir = self.directory.join(extension);
        self.entries
            .iter()
            .filter(|entry| entry.extension_key() == extension)
            .map(|entry| PlannedMove {
                source: self.directory.join(&entry.name),
                destination: target_dir.join(&entry.name),
            })
            .collect()
    }

    /// Plans moving every file into a folder named after its year.
    pub fn plan_by_year(&self) -> Vec<PlannedMove> {
        self.entries
            .iter()
            .map(|entry| PlannedMove {
                source: self.directory.join(&entry.name),
                destination: self.directory.join(&entry.year).join(&entry.name),
            })
            .collect()
    }

    /// One `- name` line per file, for prompts and summaries.
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("- {}", entry.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn modification_year(path: &Path) -> io::Result<String> {
    let modified = fs::metadata(path)?.modified()?;
    let local: DateTime<Local> = modified.into();
    Ok(local.year().to_string())
}

/// A possible grouping of the directory's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grouping {
    /// Move all files with this extension group into a folder named after it.
    Extension(String),
    /// Move every file into a folder named after its year.
    Year,
}

/// A non-binding, advisory description of a possible reorganization.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub grouping: Grouping,
    pub description: String,
}

/// Derives suggestions from a snapshot: one per extension group present,
/// plus year grouping when the snapshot is non-empty. Pure; never mutates.
pub fn suggestions(snapshot: &DirectorySnapshot) -> Vec<Suggestion> {
    let mut extensions: Vec<&str> = snapshot
        .entries
        .iter()
        .map(|entry| entry.extension_key())
        .collect();
    extensions.sort_unstable();
    extensions.dedup();

    let mut result: Vec<Suggestion> = extensions
        .into_iter()
        .map(|ext| Suggestion {
            grouping: Grouping::Extension(ext.to_string()),
            description: format!("Move all .{} files into '{}/'", ext, ext),
        })
        .collect();

    if !snapshot.entries.is_empty() {
        result.push(Suggestion {
            grouping: Grouping::Year,
            description: "Group files into folders based on year in filename".to_string(),
        });
    }

    result
}

/// External source of free-form reorganization advice.
///
/// Implementations may call out to anything (including AI services); the
/// returned text is advisory only and must never be treated as structured
/// commands or executed without user confirmation. The core never depends on
/// this output being well-formed.
pub trait SuggestionProvider {
    /// Produces free-form suggestion text for the given prompt.
    fn suggest(&self, prompt: &str) -> Result<String, Box<dyn std::error::Error>>;
}

/// Builds the prompt handed to a [`SuggestionProvider`]: the directory
/// listing followed by the user's instruction.
pub fn build_prompt(snapshot: &DirectorySnapshot, instruction: &str) -> String {
    format!(
        "Directory: {}\n\nFiles:\n{}\n\nInstruction:\n{}",
        snapshot.directory.display(),
        snapshot.summary(),
        instruction
    )
}
