use std::fmt;
use std::io;
use thiserror::Error;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `CtxpackError` covers the failures that abort a run. Per-file read
/// failures never surface here: the collector and replayer report them
/// through a [`ReportSink`](crate::report::ReportSink) and keep going.
///
/// # Error Categories
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Configuration file or CLI argument errors |
/// | `RootNotDirectory` | Precondition: root directory missing |
/// | `PathListMissing` | Precondition: path list to replay is missing |
/// | `PathListUnreadable` | Path list exists but cannot be read as UTF-8 text |
/// | `OutputIo` | An output artifact could not be created or written |
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration errors |
/// | 3 | Missing root directory, missing or non-UTF-8 path list |
/// | 4 | Output artifact I/O failure |
/// | 1 | Other errors |
///
/// # Example
///
/// ```rust
/// use ctxpack_utils::error::CtxpackError;
///
/// fn handle_error(err: CtxpackError) {
///     eprintln!("{}", err.display_for_user());
///     std::process::exit(err.to_exit_code().as_i32());
/// }
/// ```
///
/// Library code returns `CtxpackError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum CtxpackError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Root directory '{path}' does not exist or is not a directory")]
    RootNotDirectory { path: String },

    #[error("Path list '{path}' does not exist")]
    PathListMissing { path: String },

    #[error("Path list '{path}' could not be read: {source}")]
    PathListUnreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output artifact {path}: {source}")]
    OutputIo {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Precondition,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Precondition => write!(f, "Precondition"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {path}")
            }
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with optional [defaults] and [exclusions] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, value: _ } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { path: _ } => Some(
                "ctxpack searches for .ctxpack/config.toml starting from the current directory upward."
                    .to_string(),
            ),
            Self::DiscoveryFailed { reason: _ } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Remove unknown keys from the [defaults] and [exclusions] sections".to_string(),
            ],
            Self::InvalidValue { key, value: _ } => match key.as_str() {
                "output_file" | "names_file" | "replay_output_file" => vec![
                    "Use a plain file name such as 'project_context.txt'".to_string(),
                    "Artifacts are always written inside the root directory".to_string(),
                ],
                "decode" => vec!["Use 'drop' or 'replace'".to_string()],
                "exclusions.extra_patterns" => vec![
                    "Use glob syntax such as '**/*.min.js'".to_string(),
                    "Escape literal brackets with '[[]' and '[]]'".to_string(),
                ],
                _ => vec![
                    "Remove the option to use the default value".to_string(),
                ],
            },
            Self::NotFound { path: _ } => vec![
                "Create .ctxpack/config.toml in your project root".to_string(),
                "Drop --config to run with the built-in defaults".to_string(),
            ],
            Self::DiscoveryFailed { reason: _ } => vec![
                "Check read permissions on the current directory and its parents".to_string(),
                "Use --config <path> to specify the configuration file explicitly".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl UserFriendlyError for CtxpackError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(config_err) => config_err.user_message(),
            Self::RootNotDirectory { path } => {
                format!("Root directory '{path}' does not exist or is not a directory")
            }
            Self::PathListMissing { path } => {
                format!("Path list '{path}' does not exist")
            }
            Self::PathListUnreadable { path, source } => {
                format!("Could not read path list '{path}': {source}")
            }
            Self::OutputIo { path, source } => {
                format!("Could not write output file {path}: {source}")
            }
            Self::Io(io_err) => {
                format!("File system operation failed: {io_err}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(config_err) => config_err.context(),
            Self::RootNotDirectory { .. } => {
                Some("The collector walks the root directory; nothing was written.".to_string())
            }
            Self::PathListMissing { .. } => Some(
                "The replayer reads the path list produced by 'ctxpack collect'; nothing was written."
                    .to_string(),
            ),
            Self::PathListUnreadable { .. } => {
                Some("The path list must be UTF-8 text with one path per line.".to_string())
            }
            Self::OutputIo { .. } => {
                Some("Content written before the failure is left in place.".to_string())
            }
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(config_err) => config_err.suggestions(),
            Self::RootNotDirectory { .. } => vec![
                "Pass an existing directory with --root".to_string(),
                "Check the [defaults] root value in .ctxpack/config.toml".to_string(),
            ],
            Self::PathListMissing { .. } => vec![
                "Run 'ctxpack collect' first to produce the path list".to_string(),
                "Check that --root points at the same directory used for collection".to_string(),
            ],
            Self::PathListUnreadable { .. } => vec![
                "Regenerate the path list with 'ctxpack collect'".to_string(),
            ],
            Self::OutputIo { .. } => vec![
                "Check write permissions on the root directory".to_string(),
                "Check available disk space".to_string(),
            ],
            Self::Io(_) => vec![],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::RootNotDirectory { .. }
            | Self::PathListMissing { .. }
            | Self::PathListUnreadable { .. } => ErrorCategory::Precondition,
            Self::OutputIo { .. } | Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl CtxpackError {
    /// Get a user-friendly error message with context and actionable suggestions.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error: {}\n", self.user_message()));

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {}\n", ctx));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {}\n", suggestion));
            }
        }

        output
    }

    /// Map this error to the appropriate CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            CtxpackError::Config(_) => ExitCode::CLI_ARGS,
            CtxpackError::RootNotDirectory { .. }
            | CtxpackError::PathListMissing { .. }
            | CtxpackError::PathListUnreadable { .. } => ExitCode::PRECONDITION,
            CtxpackError::OutputIo { .. } => ExitCode::OUTPUT_IO,
            CtxpackError::Io(_) => ExitCode::INTERNAL,
        }
    }
}
