use camino::{Utf8Path, Utf8PathBuf};
use ctxpack_utils::error::CtxpackError;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Trailing delimiter after each record's content
pub const RECORD_DELIMITER: &str = "\n\n---\n\n";

/// One aggregate record: header line, raw content, delimiter
#[must_use]
pub fn format_record(relative_path: &str, content: &str) -> String {
    format!("--- Filename: {relative_path} ---\n{content}{RECORD_DELIMITER}")
}

/// Streaming writer for the aggregate artifact.
///
/// Records are written as they are produced and hashed on the way out, so
/// the BLAKE3 digest in the run summary covers exactly the bytes on disk.
/// Content is written verbatim; no newline translation happens.
pub struct AggregateWriter<W: Write = BufWriter<File>> {
    path: Utf8PathBuf,
    out: W,
    hasher: blake3::Hasher,
    bytes: u64,
}

impl AggregateWriter {
    /// Create (truncate) the aggregate file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`CtxpackError::OutputIo`] if the file cannot be created.
    pub fn create(path: &Utf8Path) -> Result<Self, CtxpackError> {
        let file = File::create(path).map_err(|source| output_error(path, source))?;
        Ok(Self::new(path, BufWriter::new(file)))
    }
}

impl<W: Write> AggregateWriter<W> {
    /// Wrap an arbitrary sink; `path` only labels errors
    pub fn new(path: &Utf8Path, out: W) -> Self {
        Self {
            path: path.to_path_buf(),
            out,
            hasher: blake3::Hasher::new(),
            bytes: 0,
        }
    }

    /// Append one record
    ///
    /// # Errors
    ///
    /// Returns [`CtxpackError::OutputIo`] if the write fails. Records
    /// already written stay in the file.
    pub fn write_record(&mut self, relative_path: &str, content: &str) -> Result<(), CtxpackError> {
        let record = format_record(relative_path, content);
        self.out
            .write_all(record.as_bytes())
            .map_err(|source| output_error(&self.path, source))?;
        self.hasher.update(record.as_bytes());
        self.bytes += record.len() as u64;
        Ok(())
    }

    /// Flush and return `(bytes written, hex BLAKE3 digest)`
    ///
    /// # Errors
    ///
    /// Returns [`CtxpackError::OutputIo`] if the final flush fails.
    pub fn finish(mut self) -> Result<(u64, String), CtxpackError> {
        self.out
            .flush()
            .map_err(|source| output_error(&self.path, source))?;
        Ok((self.bytes, self.hasher.finalize().to_hex().to_string()))
    }
}

/// Streaming writer for the path-list artifact: one `\n`-terminated
/// relative path per line, no escaping.
pub struct PathListWriter<W: Write = BufWriter<File>> {
    path: Utf8PathBuf,
    out: W,
}

impl PathListWriter {
    /// Create (truncate) the path list at `path`
    ///
    /// # Errors
    ///
    /// Returns [`CtxpackError::OutputIo`] if the file cannot be created.
    pub fn create(path: &Utf8Path) -> Result<Self, CtxpackError> {
        let file = File::create(path).map_err(|source| output_error(path, source))?;
        Ok(Self::new(path, BufWriter::new(file)))
    }
}

impl<W: Write> PathListWriter<W> {
    pub fn new(path: &Utf8Path, out: W) -> Self {
        Self {
            path: path.to_path_buf(),
            out,
        }
    }

    /// # Errors
    ///
    /// Returns [`CtxpackError::OutputIo`] if the write fails.
    pub fn write_path(&mut self, relative_path: &str) -> Result<(), CtxpackError> {
        writeln!(self.out, "{relative_path}").map_err(|source| output_error(&self.path, source))
    }

    /// # Errors
    ///
    /// Returns [`CtxpackError::OutputIo`] if the final flush fails.
    pub fn finish(mut self) -> Result<(), CtxpackError> {
        self.out
            .flush()
            .map_err(|source| output_error(&self.path, source))
    }
}

fn output_error(path: &Utf8Path, source: io::Error) -> CtxpackError {
    CtxpackError::OutputIo {
        path: path.to_string(),
        source,
    }
}
