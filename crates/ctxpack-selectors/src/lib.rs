//! Exclusion tables and the extension-based text classifier.
//!
//! The built-in tables are the compatibility surface of the tool: an
//! aggregate produced with the defaults must contain exactly the files the
//! tables let through. Configuration can only add to them.

use camino::Utf8Path;
use ctxpack_utils::error::{ConfigError, CtxpackError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;

mod classify;

pub use classify::{dotted_extension, is_likely_text, normalize_extension};

/// Directory names that are never descended into, at any depth.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "ui",
    "archive",
    "arcive",
    ".mypy_cache",
    ".bolt",
    ".git",
    ".idea",
    "venv",
    ".venv",
    "__pycache__",
    "node_modules",
    "build",
    "dist",
    "env",
    ".env",
    "db",
    "log",
];

/// File names that are never collected: lockfiles, manifests, readme and
/// license files, the generator scripts and the default artifact names.
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &[
    "bun.lockb",
    "package-lock.json",
    "README.md",
    "LICENSE",
    "requirements.txt",
    "setup.py",
    "data_context.py",
    "data_context_step2.py",
    "project_context.txt",
    "file_names.txt",
];

/// Extensions (lower case, leading dot) treated as binary.
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
    // compiled artifacts
    ".pyc", ".pem", ".stl", ".pyo", ".pyd", ".dll", ".exe", ".so", ".o", ".a", ".lib", ".jar",
    ".class",
    // images
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".svg", ".tiff",
    // audio
    ".mp3", ".wav", ".ogg", ".flac",
    // video
    ".mp4", ".avi", ".mov", ".wmv", ".mkv",
    // archives
    ".zip", ".rar", ".tar", ".gz", ".7z",
    // documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // databases
    ".db", ".sqlite", ".sqlite3",
    // ML models and serialized objects
    ".pkl", ".joblib", ".h5", ".pth", ".onnx", ".ipynb_checkpoints",
];

/// User additions to the built-in exclusion tables (`[exclusions]` in config)
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct Exclusions {
    #[serde(default)]
    pub extra_dirs: Vec<String>,
    #[serde(default)]
    pub extra_files: Vec<String>,
    #[serde(default)]
    pub extra_extensions: Vec<String>,
    /// Globs matched against the root-relative path of each file
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

impl Exclusions {
    /// Validate glob patterns in the additions
    pub fn validate(&self) -> Result<(), CtxpackError> {
        for pattern in &self.extra_patterns {
            Glob::new(pattern).map_err(|e| {
                CtxpackError::Config(ConfigError::InvalidValue {
                    key: "exclusions.extra_patterns".to_string(),
                    value: format!("Invalid glob pattern '{pattern}': {e}"),
                })
            })?;
        }

        for ext in &self.extra_extensions {
            if normalize_extension(ext) == "." {
                return Err(CtxpackError::Config(ConfigError::InvalidValue {
                    key: "exclusions.extra_extensions".to_string(),
                    value: "empty extension".to_string(),
                }));
            }
        }

        Ok(())
    }
}

/// The effective, immutable exclusion configuration for one run.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    dirs: HashSet<String>,
    files: HashSet<String>,
    extensions: HashSet<String>,
    patterns: GlobSet,
}

impl ExclusionRules {
    /// Built-in tables plus `additions`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any extra glob pattern is invalid.
    pub fn new(additions: &Exclusions) -> Result<Self, CtxpackError> {
        additions.validate()?;

        let dirs = DEFAULT_EXCLUDED_DIRS
            .iter()
            .map(|s| (*s).to_string())
            .chain(additions.extra_dirs.iter().cloned())
            .collect();
        let files = DEFAULT_EXCLUDED_FILES
            .iter()
            .map(|s| (*s).to_string())
            .chain(additions.extra_files.iter().cloned())
            .collect();
        let extensions = DEFAULT_EXCLUDED_EXTENSIONS
            .iter()
            .map(|s| (*s).to_string())
            .chain(additions.extra_extensions.iter().map(|e| normalize_extension(e)))
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &additions.extra_patterns {
            // validated above
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        let patterns = builder.build().map_err(|e| {
            CtxpackError::Config(ConfigError::InvalidValue {
                key: "exclusions.extra_patterns".to_string(),
                value: e.to_string(),
            })
        })?;

        Ok(Self {
            dirs,
            files,
            extensions,
            patterns,
        })
    }

    /// Add file names that must never be collected, typically the
    /// configured artifact names.
    #[must_use]
    pub fn with_excluded_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add directory names that are never descended into
    #[must_use]
    pub fn with_excluded_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirs.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }

    #[must_use]
    pub fn is_excluded_file(&self, name: &str) -> bool {
        self.files.contains(name)
    }

    /// Whether the root-relative path matches one of the extra glob patterns
    #[must_use]
    pub fn matches_pattern(&self, relative: &Utf8Path) -> bool {
        !self.patterns.is_empty() && self.patterns.is_match(relative.as_str())
    }

    #[must_use]
    pub fn is_likely_text(&self, path: &Utf8Path) -> bool {
        is_likely_text(path, &self.extensions)
    }

    /// Sorted excluded directory names (for display)
    #[must_use]
    pub fn excluded_dirs(&self) -> Vec<&str> {
        sorted(&self.dirs)
    }

    /// Sorted excluded file names (for display)
    #[must_use]
    pub fn excluded_files(&self) -> Vec<&str> {
        sorted(&self.files)
    }

    /// Sorted excluded extensions (for display)
    #[must_use]
    pub fn excluded_extensions(&self) -> Vec<&str> {
        sorted(&self.extensions)
    }
}

impl Default for ExclusionRules {
    fn default() -> Self {
        let dirs = DEFAULT_EXCLUDED_DIRS.iter().map(|s| (*s).to_string()).collect();
        let files = DEFAULT_EXCLUDED_FILES.iter().map(|s| (*s).to_string()).collect();
        let extensions = DEFAULT_EXCLUDED_EXTENSIONS
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        Self {
            dirs,
            files,
            extensions,
            patterns: GlobSet::empty(),
        }
    }
}

fn sorted(set: &HashSet<String>) -> Vec<&str> {
    let mut items: Vec<&str> = set.iter().map(String::as_str).collect();
    items.sort_unstable();
    items
}
