//! `MediaFramework` implemented with ffmpeg and ffprobe.
//!
//! Each capability is one or two export sessions. Commands are assembled by
//! the `build_*` functions below (kept free of I/O so they can be inspected
//! in tests) and executed through `run_ffmpeg`.

use crate::cancel::CancellationFlag;
use crate::config::{AudioMixPolicy, BridgeConfig};
use crate::error::{CoreError, CoreResult};
use crate::external::{
    AudioTrack, CrateFfprobeExecutor, FfmpegSpawner, FfprobeExecutor, MediaTracks, SidecarSpawner,
    run_ffmpeg,
};
use crate::framework::MediaFramework;
use crate::media_path::MediaPath;
use crate::payload::{ConvertedAudio, MergedOutput, SeparatedTracks};
use crate::temp_files::{create_output_path, persist_output, persist_outputs};

use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, info};
use std::path::Path;

const AUDIO_MIX_FILTER: &str =
    "[0:a:0][1:a:0]amix=inputs=2:duration=first:dropout_transition=0[mixed]";

/// Production media framework driving the ffmpeg/ffprobe binaries.
#[derive(Debug, Clone, Default)]
pub struct FfmpegFramework<S = SidecarSpawner, P = CrateFfprobeExecutor> {
    spawner: S,
    prober: P,
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> FfmpegFramework<S, P> {
    pub fn new(spawner: S, prober: P) -> Self {
        Self { spawner, prober }
    }
}

// ============================================================================
// COMMAND BUILDERS
// ============================================================================

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn push_aac_encoding(cmd: &mut FfmpegCommand, config: &BridgeConfig) {
    cmd.args(["-c:a", "aac"]);
    cmd.args(["-profile:a", "aac_low"]);
    cmd.args(["-b:a", &config.audio_bitrate_arg()]);
}

fn push_container_flags(cmd: &mut FfmpegCommand, config: &BridgeConfig) {
    if config.optimize_for_network {
        cmd.args(["-movflags", "+faststart"]);
    }
}

/// Extracts the first audio track into an M4A file.
///
/// AAC is stream-copied; anything else is encoded to AAC-LC.
pub fn build_audio_extract_command(
    config: &BridgeConfig,
    input: &Path,
    track: &AudioTrack,
    output: &Path,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.input(path_arg(input));
    cmd.args(["-map", "0:a:0"]);
    cmd.arg("-vn");
    cmd.arg("-sn");
    cmd.arg("-dn");
    if track.is_aac() {
        cmd.args(["-c:a", "copy"]);
    } else {
        push_aac_encoding(&mut cmd, config);
    }
    push_container_flags(&mut cmd, config);
    cmd.output(path_arg(output));
    cmd
}

/// Extracts the first video track, without audio, into an MP4 file.
pub fn build_video_extract_command(
    config: &BridgeConfig,
    input: &Path,
    output: &Path,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.input(path_arg(input));
    cmd.args(["-map", "0:v:0"]);
    cmd.arg("-an");
    cmd.arg("-sn");
    cmd.arg("-dn");
    cmd.args(["-c:v", "copy"]);
    cmd.args(["-map_metadata", "0"]);
    push_container_flags(&mut cmd, config);
    cmd.output(path_arg(output));
    cmd
}

/// Composes the video's first video track with the external audio.
///
/// The video stream is copied (orientation metadata included) and the output
/// is cut to `video_duration` when it is known.
pub fn build_merge_command(
    config: &BridgeConfig,
    video: &Path,
    audio: &Path,
    policy: AudioMixPolicy,
    video_duration: Option<f64>,
    output: &Path,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.input(path_arg(video));
    cmd.input(path_arg(audio));
    match policy {
        AudioMixPolicy::Replace => {
            cmd.args(["-map", "0:v:0"]);
            cmd.args(["-map", "1:a:0"]);
        }
        AudioMixPolicy::Mix => {
            cmd.args(["-filter_complex", AUDIO_MIX_FILTER]);
            cmd.args(["-map", "0:v:0"]);
            cmd.args(["-map", "[mixed]"]);
        }
    }
    cmd.args(["-c:v", "copy"]);
    push_aac_encoding(&mut cmd, config);
    if let Some(duration) = video_duration {
        cmd.args(["-t", &format!("{duration:.3}")]);
    }
    cmd.args(["-map_metadata", "0"]);
    push_container_flags(&mut cmd, config);
    cmd.output(path_arg(output));
    cmd
}

/// Re-encodes the first audio track to AAC-LC in an M4A container.
///
/// Sample rate and channel count are left as in the source.
pub fn build_transcode_command(
    config: &BridgeConfig,
    input: &Path,
    output: &Path,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.input(path_arg(input));
    cmd.args(["-map", "0:a:0"]);
    cmd.arg("-vn");
    push_aac_encoding(&mut cmd, config);
    push_container_flags(&mut cmd, config);
    cmd.output(path_arg(output));
    cmd
}

// ============================================================================
// FRAMEWORK IMPLEMENTATION
// ============================================================================

fn require_audio<'a>(tracks: &'a MediaTracks, input: &MediaPath) -> CoreResult<&'a AudioTrack> {
    tracks
        .first_audio()
        .ok_or_else(|| CoreError::NoAudioTrack(input.to_string()))
}

fn require_video(tracks: &MediaTracks, input: &MediaPath) -> CoreResult<()> {
    tracks
        .first_video()
        .map(|_| ())
        .ok_or_else(|| CoreError::NoVideoTrack(input.to_string()))
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> MediaFramework for FfmpegFramework<S, P>
where
    S: 'static,
    P: 'static,
{
    fn load_tracks(&self, input: &MediaPath) -> CoreResult<MediaTracks> {
        self.prober.probe_tracks(input.as_path())
    }

    fn split_tracks(
        &self,
        config: &BridgeConfig,
        video: &MediaPath,
        cancel: &CancellationFlag,
    ) -> CoreResult<SeparatedTracks> {
        let tracks = self.load_tracks(video)?;
        let audio_track = require_audio(&tracks, video)?;
        require_video(&tracks, video)?;
        debug!(
            "[separate] {} has {} audio / {} video track(s); audio codec {:?}",
            video,
            tracks.audio.len(),
            tracks.video.len(),
            audio_track.codec_name
        );

        let audio_out = create_output_path(&config.output_dir, "extracted_audio", "m4a")?;
        let video_out = create_output_path(&config.output_dir, "extracted_video", "mp4")?;

        let cmd = build_audio_extract_command(config, video.as_path(), audio_track, &audio_out);
        run_ffmpeg(&self.spawner, cmd, "ffmpeg (extract audio)", cancel)?;

        let cmd = build_video_extract_command(config, video.as_path(), &video_out);
        run_ffmpeg(&self.spawner, cmd, "ffmpeg (extract video)", cancel)?;

        let [audio_path, video_path] = persist_outputs([audio_out, video_out])?;
        let separated = SeparatedTracks {
            audio_path,
            video_path,
        };
        info!(
            "[separate] {} -> audio {}, video {}",
            video,
            separated.audio_path.display(),
            separated.video_path.display()
        );
        Ok(separated)
    }

    fn compose_tracks(
        &self,
        config: &BridgeConfig,
        video: &MediaPath,
        audio: &MediaPath,
        cancel: &CancellationFlag,
    ) -> CoreResult<MergedOutput> {
        let (video_tracks, audio_tracks) =
            rayon::join(|| self.load_tracks(video), || self.load_tracks(audio));
        let video_tracks = video_tracks?;
        let audio_tracks = audio_tracks?;

        require_video(&video_tracks, video)?;
        require_audio(&audio_tracks, audio)?;

        let policy = match config.mix_policy {
            AudioMixPolicy::Mix if video_tracks.first_audio().is_none() => {
                debug!("[merge] {video} has no audio to mix with, replacing instead");
                AudioMixPolicy::Replace
            }
            policy => policy,
        };

        let output = create_output_path(&config.output_dir, "merged_video", "mp4")?;
        let cmd = build_merge_command(
            config,
            video.as_path(),
            audio.as_path(),
            policy,
            video_tracks.duration_secs,
            &output,
        );
        run_ffmpeg(&self.spawner, cmd, "ffmpeg (merge)", cancel)?;

        let merged = MergedOutput {
            output_path: persist_output(output)?,
        };
        info!(
            "[merge] {} + {} ({policy}) -> {}",
            video,
            audio,
            merged.output_path.display()
        );
        Ok(merged)
    }

    fn transcode_audio(
        &self,
        config: &BridgeConfig,
        input: &MediaPath,
        cancel: &CancellationFlag,
    ) -> CoreResult<ConvertedAudio> {
        let tracks = self.load_tracks(input)?;
        require_audio(&tracks, input)?;

        let output = create_output_path(&config.output_dir, "converted_audio", "m4a")?;
        let cmd = build_transcode_command(config, input.as_path(), &output);
        run_ffmpeg(&self.spawner, cmd, "ffmpeg (convert audio)", cancel)?;

        let converted = ConvertedAudio {
            output_path: persist_output(output)?,
        };
        info!("[convert] {} -> {}", input, converted.output_path.display());
        Ok(converted)
    }
}
