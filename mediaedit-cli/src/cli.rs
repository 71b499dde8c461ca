// mediaedit-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use mediaedit_core::AudioMixPolicy;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "mediaedit: split and merge audio/video tracks",
    long_about = "Separates the audio and video tracks of a file, or replaces/mixes the \
                  soundtrack of a video, using ffmpeg via the mediaedit-core bridge."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory where output files are written (defaults to the system temp directory).
    /// Can also be set via the MEDIAEDIT_OUTPUT_DIR environment variable.
    #[arg(
        short = 'o',
        long,
        global = true,
        value_name = "OUTPUT_DIR",
        env = "MEDIAEDIT_OUTPUT_DIR"
    )]
    pub output_dir: Option<PathBuf>,

    /// How a merge treats audio already present in the video: `replace` or `mix`.
    /// Can also be set via the MEDIAEDIT_MIX_POLICY environment variable.
    #[arg(
        long,
        global = true,
        value_name = "POLICY",
        env = "MEDIAEDIT_MIX_POLICY",
        default_value = "replace"
    )]
    pub mix_policy: AudioMixPolicy,

    /// AAC bitrate in kb/s for encoded audio (32-512)
    #[arg(long, global = true, value_name = "KBPS")]
    pub audio_bitrate: Option<u32>,

    /// Skip moving the moov atom to the front of merged MP4 files
    #[arg(long, global = true, default_value_t = false)]
    pub no_faststart: bool,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Print resolved payloads as JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Splits a video into an audio-only .m4a and a video-only .mp4
    Separate {
        /// Video file (plain path or file:// URL)
        #[arg(value_name = "VIDEO")]
        video: String,
    },

    /// Writes a new video whose soundtrack comes from AUDIO
    Merge {
        /// Video file supplying the picture
        #[arg(value_name = "VIDEO")]
        video: String,

        /// Audio file supplying the soundtrack
        #[arg(value_name = "AUDIO")]
        audio: String,
    },

    /// Converts an MP3 (or any file with audio) to AAC in an .m4a container
    Convert {
        #[arg(value_name = "MP3")]
        mp3: String,
    },

    /// Calls a bridge method by name with a JSON array of arguments
    Invoke {
        /// Method name, e.g. separateAudioVideo
        #[arg(value_name = "METHOD")]
        method: String,

        /// Positional arguments as a JSON array, e.g. '["/videos/clip.mp4"]'
        #[arg(value_name = "ARGS_JSON", default_value = "[]")]
        args_json: String,
    },

    /// Checks that ffmpeg and ffprobe are available
    Doctor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_merge_with_global_mix_policy() {
        let cli = Cli::try_parse_from([
            "mediaedit",
            "merge",
            "/v.mp4",
            "/a.m4a",
            "--mix-policy",
            "mix",
        ])
        .unwrap();
        assert_eq!(cli.mix_policy, AudioMixPolicy::Mix);
        assert!(matches!(cli.command, Commands::Merge { .. }));
    }

    #[test]
    fn test_invalid_mix_policy_is_rejected() {
        let result = Cli::try_parse_from(["mediaedit", "--mix-policy", "blend", "doctor"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invoke_args_default_to_empty_array() {
        let cli = Cli::try_parse_from(["mediaedit", "invoke", "cancelProcessing"]).unwrap();
        match cli.command {
            Commands::Invoke { method, args_json } => {
                assert_eq!(method, "cancelProcessing");
                assert_eq!(args_json, "[]");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
