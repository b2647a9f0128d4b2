//! Progress and diagnostic reporting.
//!
//! The collector and replayer never print. Every decision they make is sent
//! to a [`ReportSink`] as a `(level, path, message)` triple; the CLI decides
//! how that reaches the terminal.

use std::fmt;

/// Kind of a reported event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportLevel {
    /// Run-level progress: start, directory entered, completion
    Progress,
    /// A file was written to the aggregate
    Included,
    /// A file was filtered out; a normal decision, not a failure
    Skipped,
    /// A file or directory could not be read; the run continues
    Error,
}

impl ReportLevel {
    /// Console marker used in front of per-file lines
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Progress => "",
            Self::Included => "[+]",
            Self::Skipped => "[-]",
            Self::Error => "[!]",
        }
    }
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Progress => write!(f, "progress"),
            Self::Included => write!(f, "included"),
            Self::Skipped => write!(f, "skipped"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Receiver for progress and diagnostic events
pub trait ReportSink {
    fn report(&mut self, level: ReportLevel, path: &str, message: &str);
}

impl<F> ReportSink for F
where
    F: FnMut(ReportLevel, &str, &str),
{
    fn report(&mut self, level: ReportLevel, path: &str, message: &str) {
        self(level, path, message);
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn report(&mut self, _level: ReportLevel, _path: &str, _message: &str) {}
}

/// One event captured by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEvent {
    pub level: ReportLevel,
    pub path: String,
    pub message: String,
}

/// Sink that keeps every event in memory, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<ReportEvent>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// Paths reported at `level`, in report order
    #[must_use]
    pub fn paths_at(&self, level: ReportLevel) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.path.as_str())
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn report(&mut self, level: ReportLevel, path: &str, message: &str) {
        self.events.push(ReportEvent {
            level,
            path: path.to_string(),
            message: message.to_string(),
        });
    }
}
