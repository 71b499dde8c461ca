//! Configuration structures and constants for the mediaedit-core library.
//!
//! The bridge needs to know where to write its outputs, how to treat the
//! existing audio of a video when merging, and how to encode AAC audio.

mod builder;

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use builder::BridgeConfigBuilder;

// Default constants

/// Default AAC bitrate in kb/s for encoded audio (AAC-LC, 128 kb/s).
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 128;

/// Lowest accepted AAC bitrate in kb/s.
pub const MIN_AUDIO_BITRATE_KBPS: u32 = 32;

/// Highest accepted AAC bitrate in kb/s.
pub const MAX_AUDIO_BITRATE_KBPS: u32 = 512;

/// Whether outputs get their index moved to the front of the file by default.
pub const DEFAULT_OPTIMIZE_FOR_NETWORK: bool = true;

/// How the external audio is combined with a video's existing audio on merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMixPolicy {
    /// The merged output carries only the external audio.
    Replace,
    /// The video's own audio and the external audio are mixed together.
    Mix,
}

impl fmt::Display for AudioMixPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioMixPolicy::Replace => f.write_str("replace"),
            AudioMixPolicy::Mix => f.write_str("mix"),
        }
    }
}

impl FromStr for AudioMixPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(AudioMixPolicy::Replace),
            "mix" | "overlay" => Ok(AudioMixPolicy::Mix),
            other => Err(CoreError::Config(format!(
                "Unknown audio mix policy '{other}' (expected 'replace' or 'mix')"
            ))),
        }
    }
}

/// Configuration for a `MediaEditBridge`.
///
/// There is no `Default`: the mix policy has no sensible default and must be
/// chosen explicitly. Use [`BridgeConfigBuilder`] to construct one.
///
/// # Examples
///
/// ```rust
/// use mediaedit_core::config::{AudioMixPolicy, BridgeConfigBuilder};
///
/// let config = BridgeConfigBuilder::new()
///     .output_dir("/tmp/mediaedit")
///     .mix_policy(AudioMixPolicy::Replace)
///     .audio_bitrate_kbps(160)
///     .build()
///     .unwrap();
/// assert_eq!(config.audio_bitrate_kbps, 160);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Directory where produced files are written
    pub output_dir: PathBuf,

    /// Merge policy for the video's existing audio
    pub mix_policy: AudioMixPolicy,

    /// AAC bitrate (kb/s) used whenever audio has to be encoded
    pub audio_bitrate_kbps: u32,

    /// Adds `-movflags +faststart` to MP4/M4A outputs
    pub optimize_for_network: bool,
}

impl BridgeConfig {
    /// Checks that the configuration values are usable.
    pub fn validate(&self) -> CoreResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(CoreError::Config("output directory must not be empty".into()));
        }
        if self.output_dir.is_file() {
            return Err(CoreError::Config(format!(
                "output directory '{}' is a file",
                self.output_dir.display()
            )));
        }
        if !(MIN_AUDIO_BITRATE_KBPS..=MAX_AUDIO_BITRATE_KBPS).contains(&self.audio_bitrate_kbps) {
            return Err(CoreError::Config(format!(
                "audio bitrate {} kb/s is outside {MIN_AUDIO_BITRATE_KBPS}-{MAX_AUDIO_BITRATE_KBPS}",
                self.audio_bitrate_kbps
            )));
        }
        Ok(())
    }

    /// Bitrate formatted as an ffmpeg argument, e.g. `128k`.
    pub fn audio_bitrate_arg(&self) -> String {
        format!("{}k", self.audio_bitrate_kbps)
    }
}
