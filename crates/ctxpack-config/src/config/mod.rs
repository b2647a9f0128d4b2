//! Configuration management for ctxpack
//!
//! This module provides hierarchical configuration with discovery and
//! precedence: CLI > config file > defaults.

mod discovery;
mod model;
mod sources;
mod validation;

pub use model::{CliArgs, Config, ConfigSource, FileDefaults};

/// Name of the directory holding the config file
pub const CONFIG_DIR: &str = ".ctxpack";
/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Default aggregate output name
pub const DEFAULT_OUTPUT_FILE: &str = "project_context.txt";
/// Default path-list name
pub const DEFAULT_NAMES_FILE: &str = "file_names.txt";
/// Default replay output name
pub const DEFAULT_REPLAY_OUTPUT_FILE: &str = "filtered_project_context.txt";
