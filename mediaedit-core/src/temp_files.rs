//! Output file management.
//!
//! Every produced file starts life as a `tempfile::TempPath` created inside
//! the configured output directory. The file exists (empty) from the moment
//! its name is chosen, so concurrent operations can never pick the same name.
//! If the operation fails or is cancelled the `TempPath` is dropped and the
//! partial output is removed; on success it is persisted with `keep`.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempPath};

/// Creates a uniquely named, auto-deleting output file `<prefix>_<random>.<extension>`.
pub fn create_output_path(dir: &Path, prefix: &str, extension: &str) -> CoreResult<TempPath> {
    std::fs::create_dir_all(dir)?;
    let temp_file = TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .suffix(&format!(".{extension}"))
        .rand_bytes(12)
        .tempfile_in(dir)?;

    Ok(temp_file.into_temp_path())
}

/// Persists an output created by [`create_output_path`], returning its final path.
pub fn persist_output(temp_path: TempPath) -> CoreResult<PathBuf> {
    let path = temp_path.to_path_buf();
    temp_path
        .keep()
        .map_err(|e| CoreError::PathError(format!("failed to persist '{}': {e}", path.display())))
}

/// Persists outputs that belong together: either all of them are kept or none.
///
/// Outputs not yet reached when a persist fails are dropped, and so deleted.
pub fn persist_outputs<const N: usize>(outputs: [TempPath; N]) -> CoreResult<[PathBuf; N]> {
    let kept = keep_all(outputs, persist_output)?;
    kept.try_into()
        .map_err(|_| CoreError::PathError("persisted output count changed".into()))
}

fn keep_all<T, I, F>(items: I, mut keep: F) -> CoreResult<Vec<PathBuf>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> CoreResult<PathBuf>,
{
    let mut kept = Vec::new();
    for item in items {
        match keep(item) {
            Ok(path) => kept.push(path),
            Err(err) => {
                for path in &kept {
                    if let Err(e) = std::fs::remove_file(path) {
                        log::warn!("Failed to remove output {}: {e}", path.display());
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_paths_are_unique_and_named() {
        let dir = tempdir().unwrap();
        let first = create_output_path(dir.path(), "extracted_audio", "m4a").unwrap();
        let second = create_output_path(dir.path(), "extracted_audio", "m4a").unwrap();

        assert_ne!(first.to_path_buf(), second.to_path_buf());
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("extracted_audio_"));
        assert!(name.ends_with(".m4a"));
    }

    #[test]
    fn test_dropped_output_is_removed() {
        let dir = tempdir().unwrap();
        let temp_path = create_output_path(dir.path(), "merged_video", "mp4").unwrap();
        let path = temp_path.to_path_buf();
        assert!(path.exists());

        drop(temp_path);
        assert!(!path.exists());
    }

    #[test]
    fn test_persisted_output_survives() {
        let dir = tempdir().unwrap();
        let temp_path =
            create_output_path(&dir.path().join("nested"), "converted_audio", "m4a").unwrap();
        let path = persist_output(temp_path).unwrap();
        assert!(path.exists());
        assert!(path.starts_with(dir.path().join("nested")));
    }

    #[test]
    fn test_persist_outputs_keeps_every_file() {
        let dir = tempdir().unwrap();
        let audio = create_output_path(dir.path(), "extracted_audio", "m4a").unwrap();
        let video = create_output_path(dir.path(), "extracted_video", "mp4").unwrap();

        let [audio_path, video_path] = persist_outputs([audio, video]).unwrap();
        assert!(audio_path.exists());
        assert!(video_path.exists());
    }

    #[test]
    fn test_failed_persist_removes_outputs_already_kept() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("extracted_audio_kept.m4a");
        let second = dir.path().join("extracted_video_lost.mp4");
        std::fs::write(&first, b"audio").unwrap();
        std::fs::write(&second, b"video").unwrap();

        let result = keep_all([first.clone(), second.clone()], |path| {
            if path == second {
                Err(CoreError::PathError("disk went away".into()))
            } else {
                Ok(path)
            }
        });

        assert!(matches!(result, Err(CoreError::PathError(_))));
        assert!(!first.exists());
    }
}
