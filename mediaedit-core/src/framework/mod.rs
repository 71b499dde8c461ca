// ============================================================================
// mediaedit-core/src/framework/mod.rs
// ============================================================================
//
// MEDIA FRAMEWORK: The Collaborator That Does the Actual Media Work
//
// The bridge never touches containers or codecs itself. It delegates to a
// `MediaFramework`, which can enumerate tracks, split them into separate
// files, compose an external audio track into a video, and transcode audio.
// `FfmpegFramework` is the production implementation; tests substitute fakes.

use crate::cancel::CancellationFlag;
use crate::config::BridgeConfig;
use crate::error::CoreResult;
use crate::external::MediaTracks;
use crate::media_path::MediaPath;
use crate::payload::{ConvertedAudio, MergedOutput, SeparatedTracks};

pub mod ffmpeg;

pub use ffmpeg::FfmpegFramework;

/// Capabilities the bridge requires from the underlying multimedia framework.
///
/// Implementations are shared across concurrently running operations and
/// must not let those operations interfere: every output goes to its own
/// freshly created file. Long-running calls should poll `cancel` and return
/// `CoreError::Cancelled` once it is raised.
pub trait MediaFramework: Send + Sync + 'static {
    /// Enumerates the audio and video tracks of a file.
    fn load_tracks(&self, input: &MediaPath) -> CoreResult<MediaTracks>;

    /// Writes the first audio track and the first video track to two new files.
    fn split_tracks(
        &self,
        config: &BridgeConfig,
        video: &MediaPath,
        cancel: &CancellationFlag,
    ) -> CoreResult<SeparatedTracks>;

    /// Writes a new video whose audio comes from `audio`, per `config.mix_policy`.
    fn compose_tracks(
        &self,
        config: &BridgeConfig,
        video: &MediaPath,
        audio: &MediaPath,
        cancel: &CancellationFlag,
    ) -> CoreResult<MergedOutput>;

    /// Writes the first audio track of `input` as AAC in an M4A container.
    fn transcode_audio(
        &self,
        config: &BridgeConfig,
        input: &MediaPath,
        cancel: &CancellationFlag,
    ) -> CoreResult<ConvertedAudio>;
}
