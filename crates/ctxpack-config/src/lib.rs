//! Configuration management for ctxpack
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. The optional TOML file has `[defaults]` and
//! `[exclusions]` sections.

mod config;

pub use config::*;
