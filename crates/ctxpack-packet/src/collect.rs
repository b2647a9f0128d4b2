use camino::{Utf8Path, Utf8PathBuf};
use ctxpack_config::Config;
use ctxpack_selectors::ExclusionRules;
use ctxpack_utils::decode::{DecodePolicy, read_text};
use ctxpack_utils::error::CtxpackError;
use ctxpack_utils::paths::absolutize;
use ctxpack_utils::report::{ReportLevel, ReportSink};
use std::ffi::OsString;
use std::fs;
use std::io;

use crate::summary::{RunMode, RunSummary};
use crate::writer::{AggregateWriter, PathListWriter};

/// Walk `config.root` and write the aggregate and the path list.
///
/// The walk is depth-first and top-down: every file of a directory is
/// handled before any of its subdirectories, entries are visited in byte
/// order of their names, and excluded directories are pruned before they
/// are entered. A file is included only if it is not one of the two output
/// artifacts, its name is not excluded, its extension is not excluded and
/// its decoded content is not blank.
///
/// # Errors
///
/// - [`CtxpackError::RootNotDirectory`] if the root is missing; nothing is
///   created in that case.
/// - [`CtxpackError::Config`] if the configured exclusions are invalid.
/// - [`CtxpackError::OutputIo`] if an artifact cannot be created or
///   written. Whatever was written before the failure stays on disk.
///
/// Unreadable files and directories are reported to `sink` and counted in
/// [`RunSummary::failed`]; they never abort the run.
pub fn collect(config: &Config, sink: &mut dyn ReportSink) -> Result<RunSummary, CtxpackError> {
    let root = config.root.as_path();
    if !root.is_dir() {
        return Err(CtxpackError::RootNotDirectory {
            path: root.to_string(),
        });
    }

    let rules = config.rules()?;
    let output_path = config.output_path();
    let names_path = config.names_path();
    let artifacts = [absolutize(&output_path)?, absolutize(&names_path)?];

    let mut collector = Collector {
        root,
        rules: &rules,
        decode: config.decode,
        artifacts,
        aggregate: AggregateWriter::create(&output_path)?,
        names: PathListWriter::create(&names_path)?,
        summary: RunSummary::new(
            RunMode::Collect,
            root.to_path_buf(),
            output_path,
            names_path,
        ),
        sink,
    };

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let subdirs = collector.visit_directory(&dir)?;
        // reversed so the first name is popped first
        for name in subdirs.iter().rev() {
            if rules.is_excluded_dir(name) {
                tracing::debug!(dir = %dir.join(name), "pruned excluded directory");
                continue;
            }
            pending.push(dir.join(name));
        }
    }

    collector.finish()
}

/// What a directory entry turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
    /// Symlink to a directory; listed but never descended
    LinkedDir,
}

/// One raw directory entry: its name and, if it could be determined, its kind
type RawEntry = (OsString, io::Result<EntryKind>);

/// An entry that could not be classified
#[derive(Debug)]
struct UnreadableEntry {
    /// `None` when the entry itself could not be read
    name: Option<String>,
    message: String,
}

/// Entries of one directory, split and sorted by name
#[derive(Debug, Default)]
struct Listing {
    files: Vec<String>,
    dirs: Vec<String>,
    /// Entries whose names are not valid UTF-8
    invalid_names: Vec<String>,
    unreadable: Vec<UnreadableEntry>,
}

fn list_directory(dir: &Utf8Path) -> io::Result<Listing> {
    let entries = fs::read_dir(dir)?.map(|entry| -> io::Result<RawEntry> {
        let entry = entry?;
        let kind = entry.file_type().map(|file_type| {
            if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_symlink() && entry.path().is_dir() {
                EntryKind::LinkedDir
            } else {
                EntryKind::File
            }
        });
        Ok((entry.file_name(), kind))
    });
    Ok(split_entries(entries))
}

/// Sort raw entries into a [`Listing`]; a failing entry never hides the rest
fn split_entries<I>(entries: I) -> Listing
where
    I: IntoIterator<Item = io::Result<RawEntry>>,
{
    let mut listing = Listing::default();

    for entry in entries {
        let (raw_name, kind) = match entry {
            Ok(entry) => entry,
            Err(e) => {
                listing.unreadable.push(UnreadableEntry {
                    name: None,
                    message: format!("cannot read directory entry: {e}"),
                });
                continue;
            }
        };
        let name = match raw_name.into_string() {
            Ok(name) => name,
            Err(raw) => {
                listing
                    .invalid_names
                    .push(raw.to_string_lossy().into_owned());
                continue;
            }
        };

        match kind {
            Ok(EntryKind::Dir) => listing.dirs.push(name),
            Ok(EntryKind::LinkedDir) => {
                tracing::debug!(link = %name, "not following symlinked directory");
            }
            Ok(EntryKind::File) => listing.files.push(name),
            Err(e) => listing.unreadable.push(UnreadableEntry {
                name: Some(name),
                message: format!("cannot determine file type: {e}"),
            }),
        }
    }

    listing.files.sort_unstable();
    listing.dirs.sort_unstable();
    listing.invalid_names.sort_unstable();
    listing.unreadable.sort_by(|a, b| a.name.cmp(&b.name));
    listing
}

struct Collector<'a> {
    root: &'a Utf8Path,
    rules: &'a ExclusionRules,
    decode: DecodePolicy,
    artifacts: [Utf8PathBuf; 2],
    aggregate: AggregateWriter,
    names: PathListWriter,
    summary: RunSummary,
    sink: &'a mut dyn ReportSink,
}

impl Collector<'_> {
    /// Handle every file in `dir` and return its subdirectory names
    fn visit_directory(&mut self, dir: &Utf8Path) -> Result<Vec<String>, CtxpackError> {
        let label = relative_label(self.root, dir);
        self.summary.directories += 1;
        self.sink
            .report(ReportLevel::Progress, &label, "scanning directory");

        let listing = match list_directory(dir) {
            Ok(listing) => listing,
            Err(e) => {
                self.fail(&label, &format!("cannot read directory: {e}"));
                return Ok(Vec::new());
            }
        };

        for name in &listing.invalid_names {
            let path = dir.join(name);
            self.fail(
                relative_label(self.root, &path).as_str(),
                "name is not valid UTF-8",
            );
        }

        for entry in &listing.unreadable {
            let label = match &entry.name {
                Some(name) => relative_label(self.root, &dir.join(name)),
                None => label.clone(),
            };
            self.fail(&label, &entry.message);
        }

        for name in &listing.files {
            self.visit_file(&dir.join(name), name)?;
        }

        Ok(listing.dirs)
    }

    fn visit_file(&mut self, path: &Utf8Path, name: &str) -> Result<(), CtxpackError> {
        let relative = relative_label(self.root, path);

        if absolutize(path).is_ok_and(|abs| self.artifacts.contains(&abs)) {
            self.skip(&relative, "output artifact");
            return Ok(());
        }
        if self.rules.is_excluded_file(name) {
            self.skip(&relative, "excluded file name");
            return Ok(());
        }
        if self.rules.matches_pattern(Utf8Path::new(&relative)) {
            self.skip(&relative, "matches exclusion pattern");
            return Ok(());
        }
        if !self.rules.is_likely_text(path) {
            self.skip(&relative, "excluded extension");
            return Ok(());
        }

        match fs::metadata(path) {
            Ok(metadata) if !metadata.is_file() => {
                self.skip(&relative, "not a regular file");
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => {
                self.fail(&relative, &format!("read failed: {e}"));
                return Ok(());
            }
        }

        let content = match read_text(path, self.decode) {
            Ok(content) => content,
            Err(e) => {
                self.fail(&relative, &format!("read failed: {e}"));
                return Ok(());
            }
        };

        if content.trim().is_empty() {
            self.skip(&relative, "empty file");
            return Ok(());
        }

        self.aggregate.write_record(&relative, &content)?;
        self.names.write_path(&relative)?;
        self.summary.included += 1;
        self.sink.report(ReportLevel::Included, &relative, "added");
        Ok(())
    }

    fn skip(&mut self, path: &str, reason: &str) {
        self.summary.skipped += 1;
        self.sink.report(ReportLevel::Skipped, path, reason);
    }

    fn fail(&mut self, path: &str, reason: &str) {
        self.summary.failed += 1;
        self.sink.report(ReportLevel::Error, path, reason);
    }

    fn finish(self) -> Result<RunSummary, CtxpackError> {
        let mut summary = self.summary;
        self.names.finish()?;
        let (bytes, digest) = self.aggregate.finish()?;
        summary.bytes = bytes;
        summary.blake3 = digest;
        Ok(summary)
    }
}

/// Root-relative spelling of `path`; `"."` for the root itself
fn relative_label(root: &Utf8Path, path: &Utf8Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) if relative.as_str().is_empty() => ".".to_string(),
        Ok(relative) => relative.to_string(),
        Err(_) => path.to_string(),
    }
}
