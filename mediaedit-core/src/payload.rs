//! Success payloads delivered to the host.
//!
//! Field names serialize in camelCase; they are part of the host contract.

use serde::Serialize;
use std::path::PathBuf;

/// Result of `separateAudioVideo`: the extracted audio and video files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparatedTracks {
    pub audio_path: PathBuf,
    pub video_path: PathBuf,
}

/// Result of `mergeAudioWithVideo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedOutput {
    pub output_path: PathBuf,
}

/// Result of `convertMp3ToM4a`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedAudio {
    pub output_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_field_names() {
        let separated = SeparatedTracks {
            audio_path: PathBuf::from("/tmp/a.m4a"),
            video_path: PathBuf::from("/tmp/v.mp4"),
        };
        assert_eq!(
            serde_json::to_value(&separated).unwrap(),
            json!({ "audioPath": "/tmp/a.m4a", "videoPath": "/tmp/v.mp4" })
        );

        let merged = MergedOutput {
            output_path: PathBuf::from("/tmp/m.mp4"),
        };
        assert_eq!(
            serde_json::to_value(&merged).unwrap(),
            json!({ "outputPath": "/tmp/m.mp4" })
        );
    }
}
