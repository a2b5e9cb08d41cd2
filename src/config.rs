//! Run configuration and file exclusion rules.
//!
//! This module resolves where a run reads from and writes to, validates the
//! result, and builds the filter that decides which directory entries are
//! eligible for organization. Hidden files and a fixed set of OS artifacts
//! are always ignored; an optional TOML settings file can exclude more.
//!
//! # Settings File Format
//!
//! ```toml
//! source_dir = "/home/user/Downloads"   # optional, CLI --source wins
//! destination_base = "/home/user/Downloads"
//! log_dir = "logs"
//!
//! [exclude]
//! filenames = ["manifest.lock"]
//! extensions = ["part", "crdownload"]
//! patterns = ["*.tmp"]
//! regex = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File names that are never organized, regardless of configuration.
const SYSTEM_FILES: [&str; 4] = [".DS_Store", "Thumbs.db", "desktop.ini", ".localized"];

/// Settings file looked for in the working directory.
const LOCAL_SETTINGS_FILE: &str = ".tidydown.toml";

/// Returns true for files that are excluded from organization outright:
/// hidden files (name starts with `.`) and well-known OS artifacts.
///
/// Pure predicate over the file name; performs no I/O.
pub fn is_ignorable(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    name.starts_with('.') || SYSTEM_FILES.contains(&name.as_ref())
}

/// Errors that can occur while loading or validating configuration.
///
/// All of these are fatal: they are reported before any file is touched.
#[derive(Debug)]
pub enum ConfigError {
    /// Settings file was explicitly requested but does not exist.
    SettingsNotFound(PathBuf),
    /// Settings file could not be parsed.
    SettingsInvalid(String),
    /// An exclude glob pattern failed to compile.
    InvalidGlobPattern(String),
    /// An exclude regex failed to compile, with the compiler's reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading the settings file.
    IoError(String),
    /// No source directory was given and the platform default is unknown.
    NoSourceDir,
    /// The source directory does not exist.
    SourceDirMissing(PathBuf),
    /// The source path exists but is not a directory.
    SourceNotADirectory(PathBuf),
    /// The log directory could not be created or written.
    LogDirUnavailable { path: PathBuf, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SettingsNotFound(path) => {
                write!(f, "Settings file not found: {}", path.display())
            }
            ConfigError::SettingsInvalid(msg) => write!(f, "Invalid settings file: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid exclude glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid exclude regex '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading settings: {}", msg),
            ConfigError::NoSourceDir => {
                write!(
                    f,
                    "No source directory given and the platform Downloads folder could not be determined"
                )
            }
            ConfigError::SourceDirMissing(path) => {
                write!(f, "Source directory does not exist: {}", path.display())
            }
            ConfigError::SourceNotADirectory(path) => {
                write!(f, "Source path is not a directory: {}", path.display())
            }
            ConfigError::LogDirUnavailable { path, reason } => {
                write!(f, "Log directory {} is unavailable: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// User-supplied exclusion rules, layered on top of [`is_ignorable`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names to exclude.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// File extensions to exclude (without the dot, case-insensitive).
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude (e.g. "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Contents of the optional TOML settings file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub source_dir: Option<PathBuf>,
    pub destination_base: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,

    #[serde(default)]
    pub exclude: ExcludeRules,
}

impl Settings {
    /// Load settings, with fallback to defaults.
    ///
    /// Resolution order:
    /// 1. an explicitly given path (missing file is an error)
    /// 2. `.tidydown.toml` in the working directory
    /// 3. `~/.config/tidydown/config.toml`
    /// 4. built-in defaults
    pub fn load(settings_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = settings_path {
            return Self::load_from_file(path);
        }

        let local = PathBuf::from(LOCAL_SETTINGS_FILE);
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("tidydown").join("config.toml");
            if user.exists() {
                return Self::load_from_file(&user);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::SettingsNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::SettingsInvalid(e.to_string()))
    }
}

/// Pre-compiled exclusion rules for efficient per-file matching.
///
/// The built-in [`is_ignorable`] predicate is checked first and cannot be
/// disabled; configured rules only ever exclude additional files.
pub struct CompiledExcludes {
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl CompiledExcludes {
    /// Compile user exclusion rules, validating every pattern.
    pub fn compile(rules: &ExcludeRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            filenames: rules.filenames.iter().cloned().collect(),
            extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            patterns,
            regexes,
        })
    }

    /// Compiled form of the empty rule set: only [`is_ignorable`] applies.
    pub fn none() -> Self {
        Self::compile(&ExcludeRules::default()).expect("empty rules always compile")
    }

    /// Check whether a file is eligible for organization.
    ///
    /// Checks, in order: the fixed ignore predicate, exact filename rules,
    /// extension rules, glob patterns, regex rules.
    pub fn should_process(&self, file_path: &Path) -> bool {
        if is_ignorable(file_path) {
            return false;
        }

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.patterns.iter().any(|p| p.matches(&file_name)) {
            return false;
        }

        if self.regexes.iter().any(|r| r.is_match(&file_name)) {
            return false;
        }

        true
    }
}

/// Resolved configuration for one organization run.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// Directory whose direct children are organized.
    pub source_dir: PathBuf,
    /// Directory under which category subfolders are created.
    pub destination_base: PathBuf,
    /// Directory receiving the per-run operation log.
    pub log_dir: PathBuf,
}

impl OrganizerConfig {
    /// Resolve the configuration from CLI arguments and settings.
    ///
    /// Precedence for the source directory: CLI flag, settings file, platform
    /// Downloads folder. The destination base defaults to the source (category
    /// folders become subfolders of the organized directory), the log
    /// directory to a relative `logs` path.
    pub fn resolve(cli_source: Option<PathBuf>, settings: &Settings) -> Result<Self, ConfigError> {
        let source_dir = cli_source
            .or_else(|| settings.source_dir.clone())
            .or_else(default_source_dir)
            .ok_or(ConfigError::NoSourceDir)?;

        let destination_base = settings
            .destination_base
            .clone()
            .unwrap_or_else(|| source_dir.clone());

        let log_dir = settings
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(Self {
            source_dir,
            destination_base,
            log_dir,
        })
    }

    /// Validate the configuration.
    ///
    /// Fails when the source directory does not exist or is not a directory.
    /// Runs before any file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.source_dir.exists() {
            return Err(ConfigError::SourceDirMissing(self.source_dir.clone()));
        }

        if !self.source_dir.is_dir() {
            return Err(ConfigError::SourceNotADirectory(self.source_dir.clone()));
        }

        Ok(())
    }
}

/// Platform Downloads folder, falling back to `$HOME/Downloads`.
fn default_source_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_is_ignorable_system_files() {
        assert!(is_ignorable(Path::new(".DS_Store")));
        assert!(is_ignorable(Path::new("Thumbs.db")));
        assert!(is_ignorable(Path::new("desktop.ini")));
        assert!(is_ignorable(Path::new(".localized")));
    }

    #[test]
    fn test_is_ignorable_hidden_files() {
        assert!(is_ignorable(Path::new(".gitignore")));
        assert!(is_ignorable(Path::new(".env")));
        assert!(is_ignorable(Path::new("/some/dir/.hidden")));
    }

    #[test]
    fn test_is_ignorable_regular_files() {
        assert!(!is_ignorable(Path::new("report.pdf")));
        assert!(!is_ignorable(Path::new("photo.jpg")));
        assert!(!is_ignorable(Path::new("thumbs.db.txt")));
    }

    #[test]
    fn test_should_process_defaults_to_ignorable_only() {
        let excludes = CompiledExcludes::none();
        assert!(excludes.should_process(Path::new("report.pdf")));
        assert!(!excludes.should_process(Path::new(".DS_Store")));
        assert!(!excludes.should_process(Path::new("Thumbs.db")));
    }

    #[test]
    fn test_should_process_exclude_filename() {
        let rules = ExcludeRules {
            filenames: vec!["manifest.lock".to_string()],
            ..Default::default()
        };
        let excludes = CompiledExcludes::compile(&rules).unwrap();

        assert!(!excludes.should_process(Path::new("manifest.lock")));
        assert!(excludes.should_process(Path::new("manifest.toml")));
    }

    #[test]
    fn test_should_process_exclude_extensions_case_insensitive() {
        let rules = ExcludeRules {
            extensions: vec!["part".to_string(), ".tmp".to_string()],
            ..Default::default()
        };
        let excludes = CompiledExcludes::compile(&rules).unwrap();

        assert!(!excludes.should_process(Path::new("video.part")));
        assert!(!excludes.should_process(Path::new("video.PART")));
        assert!(!excludes.should_process(Path::new("scratch.tmp")));
        assert!(excludes.should_process(Path::new("video.mp4")));
    }

    #[test]
    fn test_should_process_exclude_glob() {
        let rules = ExcludeRules {
            patterns: vec!["*.crdownload".to_string()],
            ..Default::default()
        };
        let excludes = CompiledExcludes::compile(&rules).unwrap();

        assert!(!excludes.should_process(Path::new("big.iso.crdownload")));
        assert!(excludes.should_process(Path::new("big.iso")));
    }

    #[test]
    fn test_should_process_exclude_regex() {
        let rules = ExcludeRules {
            regex: vec![r"^draft_.*\.md$".to_string()],
            ..Default::default()
        };
        let excludes = CompiledExcludes::compile(&rules).unwrap();

        assert!(!excludes.should_process(Path::new("draft_notes.md")));
        assert!(excludes.should_process(Path::new("notes.md")));
    }

    #[test]
    fn test_excludes_cannot_readmit_system_files() {
        // Configuration only ever removes files; .DS_Store stays ignored.
        let excludes = CompiledExcludes::none();
        assert!(!excludes.should_process(Path::new(".DS_Store")));
    }

    #[test]
    fn test_invalid_glob_is_config_error() {
        let rules = ExcludeRules {
            patterns: vec!["[invalid".to_string()],
            ..Default::default()
        };
        assert!(CompiledExcludes::compile(&rules).is_err());
    }

    #[test]
    fn test_invalid_regex_is_config_error() {
        let rules = ExcludeRules {
            regex: vec!["[invalid(".to_string()],
            ..Default::default()
        };
        assert!(CompiledExcludes::compile(&rules).is_err());
    }

    #[test]
    fn test_settings_parse() {
        let settings: Settings = toml::from_str(
            r#"
            source_dir = "/tmp/in"
            log_dir = "/tmp/logs"

            [exclude]
            extensions = ["part"]
            "#,
        )
        .expect("settings should parse");

        assert_eq!(settings.source_dir, Some(PathBuf::from("/tmp/in")));
        assert_eq!(settings.destination_base, None);
        assert_eq!(settings.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(settings.exclude.extensions, vec!["part"]);
    }

    #[test]
    fn test_settings_missing_explicit_file() {
        let result = Settings::load(Some(Path::new("/no/such/settings.toml")));
        assert!(matches!(result, Err(ConfigError::SettingsNotFound(_))));
    }

    #[test]
    fn test_resolve_destination_defaults_to_source() {
        let temp = TempDir::new().unwrap();
        let config = OrganizerConfig::resolve(
            Some(temp.path().to_path_buf()),
            &Settings::default(),
        )
        .unwrap();

        assert_eq!(config.source_dir, temp.path());
        assert_eq!(config.destination_base, temp.path());
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_validate_missing_source() {
        let config = OrganizerConfig {
            source_dir: PathBuf::from("/no/such/dir"),
            destination_base: PathBuf::from("/no/such/dir"),
            log_dir: PathBuf::from("logs"),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SourceDirMissing(_))
        ));
    }

    #[test]
    fn test_validate_source_is_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("not_a_dir.txt");
        File::create(&file_path).unwrap();

        let config = OrganizerConfig {
            source_dir: file_path.clone(),
            destination_base: file_path,
            log_dir: PathBuf::from("logs"),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SourceNotADirectory(_))
        ));
    }

    #[test]
    fn test_validate_ok() {
        let temp = TempDir::new().unwrap();
        let config = OrganizerConfig {
            source_dir: temp.path().to_path_buf(),
            destination_base: temp.path().to_path_buf(),
            log_dir: temp.path().join("logs"),
        };
        assert!(config.validate().is_ok());
    }
}
