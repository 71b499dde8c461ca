// ============================================================================
// mediaedit-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for BridgeConfig
//
// Fluent construction of BridgeConfig. The output directory falls back to the
// system temporary directory; the audio mix policy has no fallback and must
// be set before `build` succeeds.

use std::path::PathBuf;

use super::{AudioMixPolicy, BridgeConfig};
use crate::error::{CoreError, CoreResult};

/// Builder for creating BridgeConfig instances.
///
/// # Examples
///
/// ```rust
/// use mediaedit_core::config::{AudioMixPolicy, BridgeConfigBuilder};
///
/// let config = BridgeConfigBuilder::new()
///     .mix_policy(AudioMixPolicy::Mix)
///     .optimize_for_network(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_dir, std::env::temp_dir());
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfigBuilder {
    output_dir: Option<PathBuf>,
    mix_policy: Option<AudioMixPolicy>,
    audio_bitrate_kbps: u32,
    optimize_for_network: bool,
}

impl Default for BridgeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeConfigBuilder {
    /// Creates a new builder with default values and no mix policy.
    pub fn new() -> Self {
        Self {
            output_dir: None,
            mix_policy: None,
            audio_bitrate_kbps: super::DEFAULT_AUDIO_BITRATE_KBPS,
            optimize_for_network: super::DEFAULT_OPTIMIZE_FOR_NETWORK,
        }
    }

    /// Sets the directory produced files are written to.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    /// Sets how a video's existing audio is treated on merge.
    pub fn mix_policy(mut self, policy: AudioMixPolicy) -> Self {
        self.mix_policy = Some(policy);
        self
    }

    /// Sets the AAC bitrate in kb/s.
    pub fn audio_bitrate_kbps(mut self, kbps: u32) -> Self {
        self.audio_bitrate_kbps = kbps;
        self
    }

    /// Enables or disables `+faststart` on MP4/M4A outputs.
    pub fn optimize_for_network(mut self, enabled: bool) -> Self {
        self.optimize_for_network = enabled;
        self
    }

    /// Builds and validates a BridgeConfig.
    ///
    /// Fails with `CoreError::Config` when no mix policy was set or a value is
    /// out of range.
    pub fn build(self) -> CoreResult<BridgeConfig> {
        let mix_policy = self.mix_policy.ok_or_else(|| {
            CoreError::Config("an audio mix policy (replace or mix) is required".into())
        })?;

        let config = BridgeConfig {
            output_dir: self.output_dir.unwrap_or_else(std::env::temp_dir),
            mix_policy,
            audio_bitrate_kbps: self.audio_bitrate_kbps,
            optimize_for_network: self.optimize_for_network,
        };
        config.validate()?;
        Ok(config)
    }
}
