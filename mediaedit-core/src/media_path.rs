//! Validation of host-supplied media paths.
//!
//! Hosts pass plain strings. Before any work is dispatched the string is
//! normalized (an optional `file://` scheme is stripped) and checked to name
//! an existing, readable regular file.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// A path to a readable media file on local storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaPath(PathBuf);

impl MediaPath {
    /// Parses and checks a host-supplied path.
    ///
    /// Fails with `CoreError::InvalidInput` when the string is empty or the
    /// file does not exist, is not a regular file, or cannot be opened.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let stripped = raw.strip_prefix(FILE_SCHEME).unwrap_or(raw);
        if stripped.is_empty() {
            return Err(CoreError::InvalidInput("media path is empty".into()));
        }

        let path = PathBuf::from(stripped);
        let metadata = std::fs::metadata(&path).map_err(|e| {
            CoreError::InvalidInput(format!("cannot access '{}': {e}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(CoreError::InvalidInput(format!(
                "'{}' is not a regular file",
                path.display()
            )));
        }
        File::open(&path).map_err(|e| {
            CoreError::InvalidInput(format!("cannot read '{}': {e}", path.display()))
        })?;

        Ok(MediaPath(path))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for MediaPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for MediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_existing_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"data").unwrap();

        let parsed = MediaPath::parse(file.to_str().unwrap()).unwrap();
        assert_eq!(parsed.as_path(), file.as_path());
    }

    #[test]
    fn test_parse_strips_file_scheme() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        std::fs::write(&file, b"data").unwrap();

        let raw = format!("file://{}", file.display());
        let parsed = MediaPath::parse(&raw).unwrap();
        assert_eq!(parsed.as_path(), file.as_path());
    }

    #[test]
    fn test_parse_rejects_missing_and_empty() {
        assert!(matches!(
            MediaPath::parse("/surely/does/not/exist.mp4"),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(MediaPath::parse(""), Err(CoreError::InvalidInput(_))));
        assert!(matches!(MediaPath::parse("file://"), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_keeps_surrounding_whitespace() {
        let dir = tempdir().unwrap();
        let exact = dir.path().join("clip.mp4");
        let padded = dir.path().join("clip.mp4 ");
        std::fs::write(&exact, b"exact").unwrap();
        std::fs::write(&padded, b"padded").unwrap();

        let parsed = MediaPath::parse(padded.to_str().unwrap()).unwrap();
        assert_eq!(parsed.as_path(), padded.as_path());

        let only_exact = tempdir().unwrap();
        let file = only_exact.path().join("song.mp3");
        std::fs::write(&file, b"data").unwrap();
        let raw = format!(" {}", file.display());
        assert!(matches!(MediaPath::parse(&raw), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_rejects_directory() {
        let dir = tempdir().unwrap();
        let err = MediaPath::parse(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }
}
