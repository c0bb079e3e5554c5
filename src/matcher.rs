/// Pattern matching for rename and move planning.
///
/// Given a directory listing and a regex, this module decides which entries
/// are affected and where each one should end up. It only plans; applying a
/// plan is the mover's job, so dry-run previews come for free.
use regex::Regex;
use std::path::{Path, PathBuf};

/// One intended relocation, computed before anything is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// The pattern supplied by the user could not be compiled.
#[derive(Debug)]
pub struct PatternError {
    pub pattern: String,
    pub reason: String,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid pattern '{}': {}", self.pattern, self.reason)
    }
}

impl std::error::Error for PatternError {}

/// Matches filenames against a regex and computes destination paths.
///
/// Matching is a regex *search* against the filename only, never the full
/// path. Names that do not match are excluded from the plan without error.
pub struct Matcher {
    pattern: Regex,
}

impl Matcher {
    /// Compiles the pattern. An invalid pattern aborts planning entirely:
    /// no valid plan can be constructed from it.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern: regex })
    }

    /// Plans a rename transform: every match in the filename is replaced
    /// using standard back-reference substitution (`$1`, `$name`).
    ///
    /// Names the substitution leaves unchanged are dropped from the plan;
    /// renaming a file onto itself is a pointless record that undo would
    /// then refuse to replay.
    pub fn plan_rename(
        &self,
        directory: &Path,
        names: &[String],
        replacement: &str,
    ) -> Vec<PlannedMove> {
        names
            .iter()
            .filter(|name| self.pattern.is_match(name))
            .filter_map(|name| {
                let new_name = self.pattern.replace_all(name, replacement);
                if new_name == name.as_str() {
                    return None;
                }
                Some(PlannedMove {
                    source: directory.join(name),
                    destination: directory.join(new_name.as_ref()),
                })
            })
            .collect()
    }

    /// Plans moving every matching file into `folder` (created on apply),
    /// keeping its filename. The folder may itself be a relative subpath,
    /// e.g. `logs/error`.
    pub fn plan_move(
        &self,
        directory: &Path,
        names: &[String],
        folder: &str,
    ) -> Vec<PlannedMove> {
        let target_dir = directory.join(folder);
        names
            .iter()
            .filter(|name| self.pattern.is_match(name))
            .map(|name| PlannedMove {
                source: directory.join(name),
                destination: target_dir.join(name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plan_move_selects_only_matches() {
        let matcher = Matcher::new(r"\.txt$").expect("pattern should compile");
        let plan = matcher.plan_move(
            Path::new("/d"),
            &names(&["a.txt", "b.txt", "note.md"]),
            "text",
        );

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].source, PathBuf::from("/d/a.txt"));
        assert_eq!(plan[0].destination, PathBuf::from("/d/text/a.txt"));
        assert_eq!(plan[1].destination, PathBuf::from("/d/text/b.txt"));
    }

    #[test]
    fn test_plan_move_supports_nested_folder() {
        let matcher = Matcher::new(r"error.*\.log$").expect("pattern should compile");
        let plan = matcher.plan_move(
            Path::new("/d"),
            &names(&["error_boot.log", "app.log"]),
            "logs/error",
        );

        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan[0].destination,
            PathBuf::from("/d/logs/error/error_boot.log")
        );
    }

    #[test]
    fn test_plan_rename_with_back_references() {
        let matcher = Matcher::new(r"IMG_(\d+)").expect("pattern should compile");
        let plan = matcher.plan_rename(
            Path::new("/d"),
            &names(&["IMG_42.jpg", "note.md"]),
            "photo_$1",
        );

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].source, PathBuf::from("/d/IMG_42.jpg"));
        assert_eq!(plan[0].destination, PathBuf::from("/d/photo_42.jpg"));
    }

    #[test]
    fn test_plan_rename_replaces_all_occurrences() {
        let matcher = Matcher::new(" ").expect("pattern should compile");
        let plan = matcher.plan_rename(
            Path::new("/d"),
            &names(&["my summer notes.txt"]),
            "_",
        );

        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan[0].destination,
            PathBuf::from("/d/my_summer_notes.txt")
        );
    }

    #[test]
    fn test_plan_rename_drops_unchanged_names() {
        // "final" matches but substituting it with itself changes nothing.
        let matcher = Matcher::new("final").expect("pattern should compile");
        let plan = matcher.plan_rename(Path::new("/d"), &names(&["final.txt"]), "final");
        assert!(plan.is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = Matcher::new("(unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_matching_is_search_not_full_match() {
        let matcher = Matcher::new("draft").expect("pattern should compile");
        let plan = matcher.plan_rename(
            Path::new("/d"),
            &names(&["report_draft_v2.txt"]),
            "final",
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan[0].destination,
            PathBuf::from("/d/report_final_v2.txt")
        );
    }
}
