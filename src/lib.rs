//! ctxpack - pack a project tree into a single context file
//!
//! The collector walks a root directory, prunes excluded directories,
//! drops binary and generated files, and concatenates every remaining text
//! file into an aggregate artifact plus a list of the included paths. The
//! replayer reads that list back (typically after it has been curated by
//! hand) and writes a filtered aggregate in the same format.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Collect the current directory into project_context.txt + file_names.txt
//! ctxpack collect
//!
//! # Edit file_names.txt, then write filtered_project_context.txt
//! ctxpack replay
//!
//! # Machine-readable run summary
//! ctxpack collect --root ../service --json
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use ctxpack::{Config, NullSink, collect};
//!
//! let config = Config::with_root("path/to/project");
//! let summary = collect(&config, &mut NullSink).expect("collection failed");
//! println!("{} files, blake3 {}", summary.included, summary.blake3);
//! ```
//!
//! # Aggregate Format
//!
//! Each record is `"--- Filename: {path} ---\n" + content + "\n\n---\n\n"`,
//! with the content written verbatim.

pub mod cli;

/// Configuration for one run.
///
/// `Config` is built with precedence CLI arguments > config file >
/// built-in defaults via [`Config::discover()`], or directly with
/// [`Config::with_root()`] when embedding.
pub use ctxpack_config::Config;

/// CLI argument overrides used by [`Config::discover()`].
pub use ctxpack_config::{CliArgs, ConfigSource};

/// Collector and replayer entry points and their result.
pub use ctxpack_packet::{RunMode, RunSummary, collect, format_record, replay};

/// Exclusion tables.
pub use ctxpack_selectors::{
    DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_EXTENSIONS, DEFAULT_EXCLUDED_FILES, ExclusionRules,
    Exclusions,
};

/// Library-level error type with user-friendly reporting.
///
/// Library code returns `CtxpackError` and does NOT call
/// `std::process::exit()`.
pub use ctxpack_utils::error::{ConfigError, CtxpackError, ErrorCategory, UserFriendlyError};

/// Exit codes matching the documented exit code table.
pub use ctxpack_utils::exit_codes::ExitCode;

pub use ctxpack_utils::decode::DecodePolicy;
pub use ctxpack_utils::report::{NullSink, RecordingSink, ReportEvent, ReportLevel, ReportSink};
