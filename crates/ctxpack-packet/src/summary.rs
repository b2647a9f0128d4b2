use camino::Utf8PathBuf;
use serde::Serialize;
use std::fmt;

/// Which pipeline produced a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Collect,
    Replay,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collect => write!(f, "collect"),
            Self::Replay => write!(f, "replay"),
        }
    }
}

/// Counters and artifact information for one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: RunMode,
    pub root: Utf8PathBuf,
    /// Aggregate artifact written by this run
    pub output: Utf8PathBuf,
    /// Path list written (collect) or read (replay)
    pub names_file: Utf8PathBuf,
    /// Directories visited; always 0 for replay
    pub directories: usize,
    pub included: usize,
    pub skipped: usize,
    /// Per-item failures that were reported and skipped
    pub failed: usize,
    /// Bytes written to the aggregate
    pub bytes: u64,
    /// Hex BLAKE3 digest of the aggregate
    pub blake3: String,
}

impl RunSummary {
    pub(crate) fn new(
        mode: RunMode,
        root: Utf8PathBuf,
        output: Utf8PathBuf,
        names_file: Utf8PathBuf,
    ) -> Self {
        Self {
            mode,
            root,
            output,
            names_file,
            directories: 0,
            included: 0,
            skipped: 0,
            failed: 0,
            bytes: 0,
            blake3: String::new(),
        }
    }

    /// Whether any item failed during the run
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
