//! Command-line interface for ctxpack
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions (clap)
//! - `run`: Main entry point and command dispatch
//! - `commands`: Command implementations
//! - `console`: Report sink that prints progress lines

pub mod args;
mod commands;
mod console;
mod run;

pub use args::{Cli, Commands, build_cli};
pub use console::ConsoleSink;
pub use run::run;
