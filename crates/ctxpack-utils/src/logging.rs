//! Logging infrastructure for ctxpack
//!
//! Structured events go through `tracing` and are rendered on stderr, so the
//! progress lines on stdout stay clean for the user (and for tests that
//! assert on them).

use tracing::{Level, error, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize tracing subscriber for structured logging
///
/// Sets up tracing with either compact (default) or verbose format.
/// `RUST_LOG` takes precedence over both.
///
/// # Arguments
/// * `verbose` - If true, enable debug events and span close timings
///
/// # Returns
/// Result indicating success or failure of initialization
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("ctxpack=debug,info")
            } else {
                EnvFilter::try_new("ctxpack=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Create a span covering one collect or replay run
pub fn run_span(mode: &str, root: &str) -> tracing::Span {
    span!(Level::INFO, "ctxpack_run", mode = %mode, root = %root)
}

/// Log run start with structured fields
pub fn log_run_start(mode: &str, root: &str, output: &str) {
    info!(mode = %mode, root = %root, output = %output, "Starting run");
}

/// Log run completion with counters and duration
pub fn log_run_complete(mode: &str, included: usize, skipped: usize, failed: usize, duration_ms: u128) {
    info!(
        mode = %mode,
        included,
        skipped,
        failed,
        duration_ms = %duration_ms,
        "Run completed"
    );
}

/// Log a fatal run error
pub fn log_run_error(mode: &str, error: &str) {
    error!(mode = %mode, error = %error, "Run failed");
}
