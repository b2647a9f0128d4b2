//! Permissive text decoding for collected files.
//!
//! Files are read as raw bytes and decoded as UTF-8 under an explicit
//! [`DecodePolicy`]. Decoding never fails: invalid sequences are either
//! dropped or replaced with U+FFFD.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// How invalid UTF-8 byte sequences are handled while decoding file content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Silently remove invalid sequences (default)
    #[default]
    Drop,
    /// Substitute each invalid sequence with U+FFFD
    Replace,
}

impl DecodePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" | "ignore" => Ok(Self::Drop),
            "replace" => Ok(Self::Replace),
            other => Err(format!("unknown decode policy '{other}' (expected 'drop' or 'replace')")),
        }
    }
}

/// Decode `bytes` as UTF-8 under `policy`.
///
/// Valid input is borrowed without copying.
#[must_use]
pub fn decode_lossy(bytes: &[u8], policy: DecodePolicy) -> Cow<'_, str> {
    match policy {
        DecodePolicy::Replace => String::from_utf8_lossy(bytes),
        DecodePolicy::Drop => match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => {
                let mut text = String::with_capacity(bytes.len());
                for chunk in bytes.utf8_chunks() {
                    text.push_str(chunk.valid());
                }
                Cow::Owned(text)
            }
        },
    }
}

/// Read a whole file and decode it under `policy`.
///
/// Only I/O failures are returned; bad bytes never are.
pub fn read_text(path: &Utf8Path, policy: DecodePolicy) -> std::io::Result<String> {
    let bytes = std::fs::read(path.as_std_path())?;
    Ok(decode_lossy(&bytes, policy).into_owned())
}
