use camino::Utf8Path;
use std::collections::HashSet;

/// Lower-cased extension of `path` including the leading dot.
///
/// Follows the usual "last dot in the file name" rule where a leading dot
/// does not start an extension: `.bashrc` has none, `a.tar.gz` has `.gz`,
/// and a trailing dot gives `"."`.
#[must_use]
pub fn dotted_extension(path: &Utf8Path) -> Option<String> {
    let name = path.file_name()?;
    let stem_start = name.len() - name.trim_start_matches('.').len();
    let dot = name[stem_start..].rfind('.')?;
    Some(name[stem_start + dot..].to_lowercase())
}

/// Whether `path` is likely a text file.
///
/// Purely name based: true unless the dotted extension is in `excluded`.
/// Entries in `excluded` must already be lower-cased with a leading dot.
#[must_use]
pub fn is_likely_text(path: &Utf8Path, excluded: &HashSet<String>) -> bool {
    match dotted_extension(path) {
        Some(ext) => !excluded.contains(&ext),
        None => true,
    }
}

/// Normalize a configured extension to lower case with a leading dot.
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}
