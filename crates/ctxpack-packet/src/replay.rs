use ctxpack_config::Config;
use ctxpack_utils::decode::read_text;
use ctxpack_utils::error::CtxpackError;
use ctxpack_utils::report::{ReportLevel, ReportSink};
use std::fs;
use std::io;

use crate::summary::{RunMode, RunSummary};
use crate::writer::AggregateWriter;

/// Re-read every file named in the path list and write the replay
/// aggregate.
///
/// Lines are trimmed and blank lines ignored. Each entry is resolved
/// against `config.root` and must be an existing regular file. No
/// exclusion rule is applied; the list is trusted as curated. Blank
/// content is still skipped.
///
/// # Errors
///
/// - [`CtxpackError::RootNotDirectory`] if the root is missing.
/// - [`CtxpackError::PathListMissing`] if the list does not exist; the
///   replay output is not created in that case.
/// - [`CtxpackError::PathListUnreadable`] if the list cannot be read as
///   UTF-8 text.
/// - [`CtxpackError::OutputIo`] if the replay output cannot be created or
///   written.
pub fn replay(config: &Config, sink: &mut dyn ReportSink) -> Result<RunSummary, CtxpackError> {
    if !config.root.is_dir() {
        return Err(CtxpackError::RootNotDirectory {
            path: config.root.to_string(),
        });
    }

    let names_path = config.names_path();
    if !names_path.is_file() {
        return Err(CtxpackError::PathListMissing {
            path: names_path.to_string(),
        });
    }

    let list = fs::read(&names_path)
        .and_then(|bytes| {
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        })
        .map_err(|source| CtxpackError::PathListUnreadable {
            path: names_path.to_string(),
            source,
        })?;

    let output_path = config.replay_output_path();
    let mut aggregate = AggregateWriter::create(&output_path)?;
    let mut summary = RunSummary::new(
        RunMode::Replay,
        config.root.clone(),
        output_path,
        names_path,
    );

    for entry in list.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let path = config.root.join(entry);

        if !path.is_file() {
            summary.failed += 1;
            sink.report(ReportLevel::Error, entry, "file does not exist");
            continue;
        }

        match read_text(&path, config.decode) {
            Ok(content) if content.trim().is_empty() => {
                summary.skipped += 1;
                sink.report(ReportLevel::Skipped, entry, "empty file");
            }
            Ok(content) => {
                aggregate.write_record(entry, &content)?;
                summary.included += 1;
                sink.report(ReportLevel::Included, entry, "added");
            }
            Err(e) => {
                summary.failed += 1;
                sink.report(ReportLevel::Error, entry, &format!("read failed: {e}"));
            }
        }
    }

    let (bytes, digest) = aggregate.finish()?;
    summary.bytes = bytes;
    summary.blake3 = digest;
    Ok(summary)
}
