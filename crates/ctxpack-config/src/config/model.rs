use camino::Utf8PathBuf;
use ctxpack_selectors::{ExclusionRules, Exclusions};
use ctxpack_utils::decode::DecodePolicy;
use ctxpack_utils::error::CtxpackError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{CONFIG_DIR, DEFAULT_NAMES_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_REPLAY_OUTPUT_FILE};

/// Effective configuration for one run.
///
/// Built once at process start and passed by reference to the collector
/// and replayer; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that is scanned and that path-list entries are relative to
    pub root: Utf8PathBuf,
    /// Aggregate output name, created inside `root`
    pub output_file: String,
    /// Path-list name, created inside `root`
    pub names_file: String,
    /// Replay output name, created inside `root`
    pub replay_output_file: String,
    pub decode: DecodePolicy,
    pub verbose: bool,
    /// Additions to the built-in exclusion tables
    pub exclusions: Exclusions,
    /// Where each effective value came from
    pub source_attribution: HashMap<String, ConfigSource>,
    /// Config file that was loaded, if any
    pub config_file: Option<Utf8PathBuf>,
}

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    ConfigFile(Utf8PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::ConfigFile(path) => write!(f, "config file ({path})"),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

/// `[defaults]` section of the config file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileDefaults {
    pub root: Option<Utf8PathBuf>,
    pub output_file: Option<String>,
    pub names_file: Option<String>,
    pub replay_output_file: Option<String>,
    pub decode: Option<DecodePolicy>,
    pub verbose: Option<bool>,
}

/// CLI arguments that take part in configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file; disables discovery
    pub config_path: Option<Utf8PathBuf>,
    pub root: Option<Utf8PathBuf>,
    pub decode: Option<DecodePolicy>,
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            names_file: DEFAULT_NAMES_FILE.to_string(),
            replay_output_file: DEFAULT_REPLAY_OUTPUT_FILE.to_string(),
            decode: DecodePolicy::default(),
            verbose: false,
            exclusions: Exclusions::default(),
            source_attribution: HashMap::new(),
            config_file: None,
        }
    }
}

impl Config {
    /// Configuration with built-in defaults scanning `root`
    #[must_use]
    pub fn with_root(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        self.root.join(&self.output_file)
    }

    #[must_use]
    pub fn names_path(&self) -> Utf8PathBuf {
        self.root.join(&self.names_file)
    }

    #[must_use]
    pub fn replay_output_path(&self) -> Utf8PathBuf {
        self.root.join(&self.replay_output_file)
    }

    /// Exclusion rules for a collection run: the built-in tables, the
    /// configured additions, every configured artifact name and the
    /// `.ctxpack` directory itself.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an extra glob pattern is invalid.
    pub fn rules(&self) -> Result<ExclusionRules, CtxpackError> {
        Ok(ExclusionRules::new(&self.exclusions)?
            .with_excluded_dirs([CONFIG_DIR])
            .with_excluded_files([
                self.output_file.as_str(),
                self.names_file.as_str(),
                self.replay_output_file.as_str(),
            ]))
    }
}
