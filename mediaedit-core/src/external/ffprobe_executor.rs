//! FFprobe integration for track enumeration.
//!
//! This module runs ffprobe against an input and reduces its output to the
//! track list the media framework needs: container, duration, and the audio
//! and video streams in file order.
use crate::error::{CoreError, CoreResult, command_start_error};
use ffprobe::{FfProbe, FfProbeError, ffprobe};
use std::path::Path;

/// An audio stream inside a container.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    /// Absolute stream index within the container
    pub stream_index: i64,
    pub codec_name: Option<String>,
    pub channels: Option<u32>,
    pub sample_rate: Option<u32>,
}

impl AudioTrack {
    /// True when the stream can be copied into an MP4/M4A container as-is.
    pub fn is_aac(&self) -> bool {
        self.codec_name.as_deref() == Some("aac")
    }
}

/// A video stream inside a container.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoTrack {
    /// Absolute stream index within the container
    pub stream_index: i64,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Track listing for one media file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaTracks {
    /// Container format name as reported by ffprobe (e.g. "mov,mp4,m4a,3gp,3g2,mj2")
    pub container: String,
    /// Duration of the media in seconds
    pub duration_secs: Option<f64>,
    pub audio: Vec<AudioTrack>,
    pub video: Vec<VideoTrack>,
}

impl MediaTracks {
    pub fn first_audio(&self) -> Option<&AudioTrack> {
        self.audio.first()
    }

    pub fn first_video(&self) -> Option<&VideoTrack> {
        self.video.first()
    }
}

/// Trait for anything that can enumerate the tracks of a media file.
pub trait FfprobeExecutor: Send + Sync {
    fn probe_tracks(&self, input_path: &Path) -> CoreResult<MediaTracks>;
}

/// `FfprobeExecutor` backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn probe_tracks(&self, input_path: &Path) -> CoreResult<MediaTracks> {
        log::debug!(
            "Running ffprobe (via crate) for tracks on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => {
                let tracks = tracks_from_metadata(&metadata);
                log::debug!(
                    "Probed {}: container={}, duration={:?}, audio={}, video={}",
                    input_path.display(),
                    tracks.container,
                    tracks.duration_secs,
                    tracks.audio.len(),
                    tracks.video.len()
                );
                Ok(tracks)
            }
            Err(err) => {
                log::error!("ffprobe failed for tracks on {}: {:?}", input_path.display(), err);
                Err(map_ffprobe_error(err, input_path))
            }
        }
    }
}

fn non_negative(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn tracks_from_metadata(metadata: &FfProbe) -> MediaTracks {
    let mut tracks = MediaTracks {
        container: metadata.format.format_name.clone(),
        duration_secs: metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0),
        ..Default::default()
    };

    for stream in &metadata.streams {
        match stream.codec_type.as_deref() {
            Some("audio") => tracks.audio.push(AudioTrack {
                stream_index: stream.index,
                codec_name: stream.codec_name.clone(),
                channels: non_negative(stream.channels),
                sample_rate: stream
                    .sample_rate
                    .as_deref()
                    .and_then(|r| r.parse::<u32>().ok()),
            }),
            // Embedded cover art is a still picture, not a video track.
            Some("video") if stream.disposition.attached_pic != 0 => {
                log::debug!("Skipping attached picture stream #{}", stream.index);
            }
            Some("video") => tracks.video.push(VideoTrack {
                stream_index: stream.index,
                codec_name: stream.codec_name.clone(),
                width: non_negative(stream.width),
                height: non_negative(stream.height),
            }),
            _ => {}
        }
    }
    tracks
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe (tracks)", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            CoreError::InvalidInput(format!(
                "'{}' is not a recognized media container: {}",
                input_path.display(),
                stderr.trim()
            ))
        }
        FfProbeError::Deserialize(err) => {
            CoreError::JsonParseError(format!("ffprobe tracks output deserialization: {err}"))
        }
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during tracks: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ffprobe::{Disposition, Format, Stream};
    use std::os::unix::process::ExitStatusExt;
    use std::process::{ExitStatus, Output};

    fn stream(index: i64, codec_type: &str, codec_name: &str) -> Stream {
        Stream {
            index,
            codec_type: Some(codec_type.to_string()),
            codec_name: Some(codec_name.to_string()),
            ..Default::default()
        }
    }

    fn metadata(duration: Option<&str>, streams: Vec<Stream>) -> FfProbe {
        FfProbe {
            streams,
            format: Format {
                format_name: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
                duration: duration.map(str::to_string),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_tracks_split_by_codec_type() {
        let mut audio = stream(1, "audio", "aac");
        audio.channels = Some(2);
        audio.sample_rate = Some("48000".to_string());
        let mut video = stream(0, "video", "h264");
        video.width = Some(1280);
        video.height = Some(720);
        let subtitle = stream(2, "subtitle", "mov_text");

        let tracks =
            tracks_from_metadata(&metadata(Some("12.480000"), vec![video, audio, subtitle]));

        assert_eq!(tracks.container, "mov,mp4,m4a,3gp,3g2,mj2");
        assert_eq!(tracks.duration_secs, Some(12.48));
        assert_eq!(tracks.video.len(), 1);
        assert_eq!(tracks.video[0].width, Some(1280));
        assert_eq!(tracks.audio.len(), 1);
        let first = tracks.first_audio().unwrap();
        assert_eq!(first.stream_index, 1);
        assert_eq!(first.channels, Some(2));
        assert_eq!(first.sample_rate, Some(48_000));
        assert!(first.is_aac());
    }

    #[test]
    fn test_cover_art_is_not_a_video_track() {
        let audio = stream(0, "audio", "aac");
        let mut cover = stream(1, "video", "mjpeg");
        cover.disposition = Disposition {
            attached_pic: 1,
            ..Default::default()
        };

        let tracks = tracks_from_metadata(&metadata(Some("200.0"), vec![audio, cover]));

        assert_eq!(tracks.audio.len(), 1);
        assert!(tracks.video.is_empty());
        assert!(tracks.first_video().is_none());
    }

    #[test]
    fn test_cover_art_from_stream_json() {
        let json = r#"{
            "streams": [
                {
                    "index": 0, "codec_name": "mp3", "codec_type": "audio",
                    "codec_tag_string": "[0][0][0][0]", "codec_tag": "0x0000",
                    "sample_rate": "44100", "channels": 2,
                    "r_frame_rate": "0/0", "avg_frame_rate": "0/0", "time_base": "1/14112000",
                    "disposition": {
                        "default": 0, "dub": 0, "original": 0, "comment": 0, "lyrics": 0,
                        "karaoke": 0, "forced": 0, "hearing_impaired": 0, "visual_impaired": 0,
                        "clean_effects": 0, "attached_pic": 0, "timed_thumbnails": 0
                    }
                },
                {
                    "index": 1, "codec_name": "mjpeg", "codec_type": "video",
                    "codec_tag_string": "[0][0][0][0]", "codec_tag": "0x0000",
                    "width": 600, "height": 600,
                    "r_frame_rate": "90000/1", "avg_frame_rate": "0/0", "time_base": "1/90000",
                    "disposition": {
                        "default": 0, "dub": 0, "original": 0, "comment": 0, "lyrics": 0,
                        "karaoke": 0, "forced": 0, "hearing_impaired": 0, "visual_impaired": 0,
                        "clean_effects": 0, "attached_pic": 1, "timed_thumbnails": 0
                    }
                }
            ],
            "format": {
                "filename": "song.mp3", "nb_streams": 2, "nb_programs": 0,
                "format_name": "mp3", "format_long_name": "MP2/3 (MPEG audio layer 2/3)",
                "duration": "215.640000", "probe_score": 51
            }
        }"#;
        let parsed: FfProbe = serde_json::from_str(json).unwrap();

        let tracks = tracks_from_metadata(&parsed);

        assert_eq!(tracks.container, "mp3");
        assert_eq!(tracks.audio.len(), 1);
        assert!(tracks.video.is_empty());
    }

    #[test]
    fn test_unusable_values_are_dropped() {
        let mut audio = stream(0, "audio", "opus");
        audio.channels = Some(-1);
        audio.sample_rate = Some("unknown".to_string());

        let tracks = tracks_from_metadata(&metadata(Some("N/A"), vec![audio]));
        assert_eq!(tracks.duration_secs, None);
        assert_eq!(tracks.audio[0].channels, None);
        assert_eq!(tracks.audio[0].sample_rate, None);
        assert!(!tracks.audio[0].is_aac());

        let zero = tracks_from_metadata(&metadata(Some("0.000000"), vec![]));
        assert_eq!(zero.duration_secs, None);
    }

    #[test]
    fn test_unreadable_container_is_invalid_input() {
        let output = Output {
            status: ExitStatus::from_raw(1 << 8),
            stdout: Vec::new(),
            stderr: b"notes.txt: Invalid data found when processing input\n".to_vec(),
        };

        let err = map_ffprobe_error(FfProbeError::Status(output), Path::new("/in/notes.txt"));

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let message = err.to_string();
        assert!(message.contains("not a recognized media container"));
        assert!(message.contains("Invalid data found"));
    }

    #[test]
    fn test_io_and_parse_errors_are_classified() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no ffprobe");
        let err = map_ffprobe_error(FfProbeError::Io(missing), Path::new("/in/clip.mp4"));
        assert!(matches!(err, CoreError::CommandStart(..)));
        assert_eq!(err.kind(), ErrorKind::ExportFailed);

        let bad_json = serde_json::from_str::<FfProbe>("{}").unwrap_err();
        let err = map_ffprobe_error(FfProbeError::Deserialize(bad_json), Path::new("/in/clip.mp4"));
        assert!(matches!(err, CoreError::JsonParseError(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
