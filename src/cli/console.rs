//! Console rendering of collector and replayer events.

use ctxpack_utils::report::{ReportLevel, ReportSink};

/// Prints progress lines to stdout and mirrors every event to `tracing`.
///
/// Directory lines are printed bare, file decisions are indented behind
/// their marker (`[+]`, `[-]`, `[!]`). With `quiet` set nothing is printed,
/// which keeps stdout clean for `--json`.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    quiet: bool,
}

impl ConsoleSink {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// The line printed for an event, if any
    #[must_use]
    pub fn render(level: ReportLevel, path: &str, message: &str) -> String {
        match level {
            ReportLevel::Progress => format!("\nScanning directory: {path}"),
            _ => format!("  {} {path}: {message}", level.marker()),
        }
    }
}

impl ReportSink for ConsoleSink {
    fn report(&mut self, level: ReportLevel, path: &str, message: &str) {
        match level {
            ReportLevel::Error => tracing::warn!(path, message, "item failed"),
            _ => tracing::debug!(%level, path, message, "item"),
        }

        if !self.quiet {
            println!("{}", Self::render(level, path, message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_file_decisions() {
        assert_eq!(
            ConsoleSink::render(ReportLevel::Included, "src/a.rs", "added"),
            "  [+] src/a.rs: added"
        );
        assert_eq!(
            ConsoleSink::render(ReportLevel::Skipped, "logo.png", "excluded extension"),
            "  [-] logo.png: excluded extension"
        );
        assert_eq!(
            ConsoleSink::render(ReportLevel::Error, "x.txt", "read failed: denied"),
            "  [!] x.txt: read failed: denied"
        );
    }

    #[test]
    fn test_render_directory_progress() {
        assert_eq!(
            ConsoleSink::render(ReportLevel::Progress, "src", "scanning directory"),
            "\nScanning directory: src"
        );
    }
}
