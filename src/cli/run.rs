//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Initializes logging
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;
use ctxpack_config::{CliArgs, Config};
use ctxpack_utils::error::CtxpackError;
use ctxpack_utils::exit_codes::ExitCode;
use ctxpack_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;

/// Main CLI execution function.
///
/// Handles ALL output including errors and returns `Result<(), ExitCode>`:
/// - On success: `Ok(())` after printing any output
/// - On error: prints the user-facing report on stderr, returns `Err(ExitCode)`
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        root: cli.root.clone(),
        decode: cli.decode,
        verbose: cli.verbose.then_some(true),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    if let Err(e) = init_tracing(config.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let result = match cli.command {
        Commands::Collect { json } => commands::execute_collect_command(&config, json),
        Commands::Replay { json } => commands::execute_replay_command(&config, json),
        Commands::Config { json } => commands::execute_config_command(&config, json),
    };

    if let Err(error) = result {
        if let Some(ctxpack_error) = error.downcast_ref::<CtxpackError>() {
            eprintln!("{}", ctxpack_error.display_for_user());
            return Err(ctxpack_error.to_exit_code());
        }

        eprintln!("✗ Unexpected error: {error:#}");
        eprintln!("\n  Run with --verbose for more detailed output");
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}
