//! Path helpers shared by the collector and replayer.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::io;

/// Make `path` absolute against the current directory and normalize it
/// lexically (`.` removed, `..` folded), without touching the filesystem.
///
/// Symlinks are not resolved, so two spellings of the same file through a
/// link still compare unequal.
pub fn absolutize(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    let absolute = std::path::absolute(path.as_std_path())?;
    let absolute = Utf8PathBuf::try_from(absolute)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(normalize_lexically(&absolute))
}

/// Fold `.` and `..` components of an absolute path.
#[must_use]
pub fn normalize_lexically(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                // `pop` refuses to go above the root
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Utf8Path::new("/a/./b/../c")),
            Utf8PathBuf::from("/a/c")
        );
        assert_eq!(
            normalize_lexically(Utf8Path::new("/../x")),
            Utf8PathBuf::from("/x")
        );
    }

    #[test]
    fn test_absolutize_relative_path() -> io::Result<()> {
        let cwd = Utf8PathBuf::try_from(std::env::current_dir()?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let abs = absolutize(Utf8Path::new("./sub/../file.txt"))?;
        assert_eq!(abs, normalize_lexically(&cwd).join("file.txt"));
        Ok(())
    }

    #[test]
    fn test_absolutize_same_file_two_spellings() -> io::Result<()> {
        let a = absolutize(Utf8Path::new("dir/./out.txt"))?;
        let b = absolutize(Utf8Path::new("dir/x/../out.txt"))?;
        assert_eq!(a, b);
        Ok(())
    }
}
