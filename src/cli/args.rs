//! CLI argument definitions and parsing structures
//!
//! Defines the command-line interface using clap: the `Cli` struct with
//! its global flags and the `Commands` subcommand enum.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use ctxpack_utils::decode::DecodePolicy;

/// ctxpack - pack a project tree into a single context file
#[derive(Parser, Debug)]
#[command(name = "ctxpack")]
#[command(about = "Concatenate the text files of a project into one context file")]
#[command(long_about = r#"
ctxpack walks a project directory, skips version control, dependency and
build directories, binary files and lockfiles, and writes every remaining
text file into a single aggregate file together with a list of the
included paths. The path list can be edited by hand and replayed into a
filtered aggregate.

EXAMPLES:
  # Collect the current directory
  ctxpack collect

  # Collect another directory and print a JSON summary
  ctxpack collect --root ../service --json

  # Replay the (edited) path list into filtered_project_context.txt
  ctxpack replay

  # Show the effective configuration and where each value came from
  ctxpack config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .ctxpack/config.toml
  Use --config to specify an explicit config file path
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Root directory to scan; path-list entries are relative to it
    #[arg(long, global = true)]
    pub root: Option<Utf8PathBuf>,

    /// Handling of invalid UTF-8 in file content: drop or replace
    #[arg(long, global = true)]
    pub decode: Option<DecodePolicy>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk the root directory and write the aggregate and the path list
    ///
    /// EXAMPLES:
    ///   ctxpack collect
    ///   ctxpack collect --root ./project --json
    Collect {
        /// Print a JSON run summary instead of progress lines
        #[arg(long)]
        json: bool,
    },

    /// Re-read the files named in the path list and write the replay aggregate
    ///
    /// No exclusion rule is applied: the list is used as written.
    ///
    /// EXAMPLES:
    ///   ctxpack replay
    ///   ctxpack replay --json
    Replay {
        /// Print a JSON run summary instead of progress lines
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and exclusion tables
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Build the clap command (for completions and tests)
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
