//! Command implementations for the ctxpack CLI

use anyhow::{Context, Result};
use camino::Utf8Path;
use ctxpack_config::Config;
use ctxpack_packet::{RunMode, RunSummary, collect, replay};
use ctxpack_utils::logging::{log_run_complete, log_run_error, log_run_start, run_span};
use ctxpack_utils::paths::absolutize;
use std::time::Instant;

use super::console::ConsoleSink;

/// Execute the collect command
pub fn execute_collect_command(config: &Config, json: bool) -> Result<()> {
    let output = config.output_path();
    if !json {
        println!("Scanning root: {}", display_path(&config.root));
        println!("Writing aggregate to: {}", display_path(&output));
        println!("Writing path list to: {}", display_path(&config.names_path()));
    }

    let summary = run_pipeline(RunMode::Collect, config, output.as_str(), json)?;

    if json {
        print_json(&summary)
    } else {
        println!("\nDone. Context saved to: {}", display_path(&summary.output));
        println!("Path list saved to: {}", display_path(&summary.names_file));
        print_counts(&summary);
        Ok(())
    }
}

/// Execute the replay command
pub fn execute_replay_command(config: &Config, json: bool) -> Result<()> {
    let output = config.replay_output_path();
    if !json {
        println!("Reading path list: {}", display_path(&config.names_path()));
        println!("Writing aggregate to: {}", display_path(&output));
    }

    let summary = run_pipeline(RunMode::Replay, config, output.as_str(), json)?;

    if json {
        print_json(&summary)
    } else {
        println!("\nDone. Context saved to: {}", display_path(&summary.output));
        print_counts(&summary);
        Ok(())
    }
}

/// Execute the config command: effective values with their sources, then
/// the exclusion tables in force for a collection run
pub fn execute_config_command(config: &Config, json: bool) -> Result<()> {
    let effective = config.effective_config();
    let rules = config.rules()?;

    if json {
        let values: serde_json::Map<String, serde_json::Value> = effective
            .iter()
            .map(|(key, (value, source))| {
                (
                    key.clone(),
                    serde_json::json!({ "value": value, "source": source }),
                )
            })
            .collect();
        let output = serde_json::json!({
            "config_file": config.config_file,
            "values": values,
            "excluded_dirs": rules.excluded_dirs(),
            "excluded_files": rules.excluded_files(),
            "excluded_extensions": rules.excluded_extensions(),
        });
        let rendered =
            serde_json::to_string_pretty(&output).context("Failed to serialize configuration")?;
        println!("{rendered}");
        return Ok(());
    }

    match &config.config_file {
        Some(path) => println!("Config file: {path}"),
        None => println!("Config file: (none)"),
    }
    println!("\nEffective configuration:");
    for (key, (value, source)) in &effective {
        println!("  {key} = {value}  [{source}]");
    }
    println!("\nExcluded directories: {}", rules.excluded_dirs().join(", "));
    println!("Excluded files: {}", rules.excluded_files().join(", "));
    println!("Excluded extensions: {}", rules.excluded_extensions().join(" "));
    Ok(())
}

fn run_pipeline(mode: RunMode, config: &Config, output: &str, json: bool) -> Result<RunSummary> {
    let mode_name = mode.to_string();
    let _span = run_span(&mode_name, config.root.as_str()).entered();
    log_run_start(&mode_name, config.root.as_str(), output);

    let start = Instant::now();
    let mut sink = ConsoleSink::new(json);
    let result = match mode {
        RunMode::Collect => collect(config, &mut sink),
        RunMode::Replay => replay(config, &mut sink),
    };

    match result {
        Ok(summary) => {
            log_run_complete(
                &mode_name,
                summary.included,
                summary.skipped,
                summary.failed,
                start.elapsed().as_millis(),
            );
            Ok(summary)
        }
        Err(e) => {
            log_run_error(&mode_name, &e.to_string());
            Err(e.into())
        }
    }
}

fn print_json(summary: &RunSummary) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
    println!("{rendered}");
    Ok(())
}

fn print_counts(summary: &RunSummary) {
    println!(
        "{} included, {} skipped, {} failed ({} bytes, blake3 {})",
        summary.included,
        summary.skipped,
        summary.failed,
        summary.bytes,
        summary.blake3.get(..16).unwrap_or(summary.blake3.as_str())
    );
    if summary.has_failures() {
        println!(
            "{} item(s) could not be read; see the [!] lines above",
            summary.failed
        );
    }
}

/// Absolute spelling for start and completion lines; falls back to the
/// path as given
fn display_path(path: &Utf8Path) -> String {
    absolutize(path).map_or_else(|_| path.to_string(), |abs| abs.to_string())
}
