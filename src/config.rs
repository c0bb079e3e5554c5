//! File filtering configuration.
//!
//! An optional TOML file controls which directory entries are considered for
//! matching and analysis. Supported rules:
//! - hidden-file handling (files starting with `.`)
//! - exact filename excludes
//! - glob pattern excludes
//! - file extension excludes
//!
//! The undo log file itself is always excluded regardless of configuration;
//! the dispatcher adds its filename to the exclusion set before compiling.
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp"]
//! extensions = ["bak"]
//! ```

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Filtering rules, deserialized from a TOML configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub filters: FilterRules,
}

/// Root-level filter rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to include hidden files (starting with "."). Defaults to false.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

fn default_enable_hidden_files() -> bool {
    false
}

/// Rules for excluding files from matching and analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "bak", "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl FilterConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Resolution order:
    /// 1. `config_path`, if provided (missing file is an error here)
    /// 2. `.filesorterrc.toml` in the current directory
    /// 3. `~/.config/filesorter/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".filesorterrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("filesorter")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the rules into structures suited to per-file matching.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filters: FilterRules {
                enable_hidden_files: false,
                exclude: ExcludeRules::default(),
            },
        }
    }
}

/// Pre-compiled filter rules.
///
/// Glob patterns are validated and compiled once so per-file checks never
/// reparse them.
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            exclude_patterns,
        })
    }

    /// Check whether a file should be considered, by filename.
    ///
    /// Checks run in order with early termination: hidden-file rule, exact
    /// filename, extension, glob patterns; anything unmatched is included.
    pub fn should_include(&self, file_name: &str) -> bool {
        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if let Some((_, ext)) = file_name.rsplit_once('.')
            && self.exclude_extensions.contains(&ext.to_lowercase())
        {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
        {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_excludes(exclude: ExcludeRules) -> CompiledFilters {
        FilterConfig {
            filters: FilterRules {
                enable_hidden_files: false,
                exclude,
            },
        }
        .compile()
        .expect("filters should compile")
    }

    #[test]
    fn test_hidden_files_excluded_by_default() {
        let compiled = FilterConfig::default().compile().expect("should compile");
        assert!(!compiled.should_include(".DS_Store"));
        assert!(!compiled.should_include(".gitignore"));
        assert!(compiled.should_include("report.txt"));
    }

    #[test]
    fn test_hidden_files_included_when_enabled() {
        let compiled = FilterConfig {
            filters: FilterRules {
                enable_hidden_files: true,
                exclude: ExcludeRules::default(),
            },
        }
        .compile()
        .expect("should compile");

        assert!(compiled.should_include(".DS_Store"));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let compiled = config_with_excludes(ExcludeRules {
            filenames: vec!["Thumbs.db".to_string()],
            ..Default::default()
        });

        assert!(!compiled.should_include("Thumbs.db"));
        assert!(compiled.should_include("image.jpg"));
    }

    #[test]
    fn test_exclude_extension_is_case_insensitive() {
        let compiled = config_with_excludes(ExcludeRules {
            extensions: vec!["bak".to_string()],
            ..Default::default()
        });

        assert!(!compiled.should_include("data.bak"));
        assert!(!compiled.should_include("data.BAK"));
        assert!(compiled.should_include("data.txt"));
    }

    #[test]
    fn test_exclude_glob_pattern() {
        let compiled = config_with_excludes(ExcludeRules {
            patterns: vec!["*.tmp".to_string()],
            ..Default::default()
        });

        assert!(!compiled.should_include("scratch.tmp"));
        assert!(compiled.should_include("scratch.txt"));
    }

    #[test]
    fn test_invalid_glob_pattern_rejected() {
        let config = FilterConfig {
            filters: FilterRules {
                enable_hidden_files: false,
                exclude: ExcludeRules {
                    patterns: vec!["[unclosed".to_string()],
                    ..Default::default()
                },
            },
        };
        assert!(config.compile().is_err());
    }

    #[test]
    fn test_parse_from_toml() {
        let config: FilterConfig = toml::from_str(
            r#"
            [filters]
            enable_hidden_files = true

            [filters.exclude]
            filenames = ["Thumbs.db"]
            extensions = ["tmp"]
            "#,
        )
        .expect("TOML should parse");

        assert!(config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.filenames, vec!["Thumbs.db"]);
    }
}
