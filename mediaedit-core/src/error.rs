// ============================================================================
// mediaedit-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Internal Errors and the Host-Facing Rejection Taxonomy
//
// Two layers live here. `CoreError` is the rich internal error produced by the
// media framework and its external tools. `Rejection` is what a host sees: a
// stable error kind (with a wire code) and a human-readable message. Every
// `CoreError` classifies into exactly one `ErrorKind`.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt::Display;
use std::process::ExitStatus;
use thiserror::Error;

/// Internal errors raised while probing, splitting, composing or exporting media.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, std::io::Error),

    #[error("Command '{0}' failed with status {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),

    #[error("JSON parsing error: {0}")]
    JsonParseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No audio track found in {0}")]
    NoAudioTrack(String),

    #[error("No video track found in {0}")]
    NoVideoTrack(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Export cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for mediaedit-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Classifies this error into the host-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_)
            | CoreError::PathError(_)
            | CoreError::FfprobeParse(_)
            | CoreError::JsonParseError(_) => ErrorKind::InvalidInput,
            CoreError::NoAudioTrack(_) => ErrorKind::NoAudioTrack,
            CoreError::NoVideoTrack(_) => ErrorKind::NoVideoTrack,
            CoreError::Io(_)
            | CoreError::CommandStart(..)
            | CoreError::CommandWait(..)
            | CoreError::CommandFailed(..)
            | CoreError::DependencyNotFound(_)
            | CoreError::ExportFailed(_) => ErrorKind::ExportFailed,
            CoreError::Cancelled => ErrorKind::Cancelled,
            CoreError::Config(_) | CoreError::OperationFailed(_) => ErrorKind::Unknown,
        }
    }
}

// ---- Error construction helpers ----

pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}

// ============================================================================
// HOST-FACING TAXONOMY
// ============================================================================

/// The kinds of failure a host can distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path missing, unreadable, or not a recognized media container.
    InvalidInput,
    /// An audio track required by the operation is absent.
    NoAudioTrack,
    /// A video track required by the operation is absent.
    NoVideoTrack,
    /// The media framework reported a failure (codec, storage, resources).
    ExportFailed,
    /// The operation was aborted before completion.
    Cancelled,
    /// Anything not otherwise classified.
    Unknown,
}

impl ErrorKind {
    /// Stable wire code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::NoAudioTrack => "NO_AUDIO_TRACK",
            ErrorKind::NoVideoTrack => "NO_VIDEO_TRACK",
            ErrorKind::ExportFailed => "EXPORT_FAILED",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A settled failure as delivered to the host: a kind and a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct Rejection {
    pub kind: ErrorKind,
    pub message: String,
}

impl Rejection {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Wire code of the rejection kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl From<CoreError> for Rejection {
    fn from(err: CoreError) -> Self {
        Rejection::new(err.kind(), err.to_string())
    }
}

impl Serialize for Rejection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rejection", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert_eq!(
            CoreError::InvalidInput("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            CoreError::FfprobeParse("bad".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            CoreError::NoAudioTrack("a.mp4".into()).kind(),
            ErrorKind::NoAudioTrack
        );
        assert_eq!(
            CoreError::NoVideoTrack("a.m4a".into()).kind(),
            ErrorKind::NoVideoTrack
        );
        assert_eq!(
            CoreError::DependencyNotFound("ffmpeg".into()).kind(),
            ErrorKind::ExportFailed
        );
        assert_eq!(
            CoreError::Io(std::io::Error::other("disk full")).kind(),
            ErrorKind::ExportFailed
        );
        assert_eq!(CoreError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            CoreError::OperationFailed("?".into()).kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_rejection_carries_code_and_message() {
        let rejection = Rejection::from(CoreError::NoAudioTrack("clip.mp4".into()));
        assert_eq!(rejection.code(), "NO_AUDIO_TRACK");
        assert_eq!(rejection.message, "No audio track found in clip.mp4");
        assert_eq!(
            rejection.to_string(),
            "NO_AUDIO_TRACK: No audio track found in clip.mp4"
        );
    }

    #[test]
    fn test_rejection_serializes_as_code_and_message() {
        let rejection = Rejection::new(ErrorKind::Cancelled, "Export cancelled");
        let json = serde_json::to_value(&rejection).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "CANCELLED", "message": "Export cancelled" })
        );
    }
}
