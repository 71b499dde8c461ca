//! Asynchronous bridge for splitting and merging audio/video tracks.
//!
//! A host application calls the bridge with file-system paths and gets back a
//! single-shot future that resolves with output paths or rejects with a typed
//! error. All media work is delegated to a `MediaFramework`; the default one
//! drives ffmpeg and ffprobe.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediaedit_core::MediaEditBridge;
//! use mediaedit_core::config::{AudioMixPolicy, BridgeConfigBuilder};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BridgeConfigBuilder::new()
//!     .output_dir("/tmp/mediaedit")
//!     .mix_policy(AudioMixPolicy::Replace)
//!     .build()?;
//! let bridge = MediaEditBridge::with_ffmpeg(config)?;
//!
//! match bridge.separate_audio_video("/videos/clip.mp4").await {
//!     Ok(tracks) => println!("{} / {}", tracks.audio_path.display(), tracks.video_path.display()),
//!     Err(rejection) => eprintln!("{}: {}", rejection.code(), rejection.message),
//! }
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod cancel;
pub mod config;
pub mod error;
pub mod external;
pub mod framework;
pub mod host;
pub mod media_path;
pub mod payload;
pub mod temp_files;

// Re-exports for public API
pub use bridge::MediaEditBridge;
pub use bridge::pending::{PendingOperation, Resolver, Settlement};
pub use cancel::CancellationFlag;
pub use config::{AudioMixPolicy, BridgeConfig, BridgeConfigBuilder};
pub use error::{CoreError, CoreResult, ErrorKind, Rejection};
pub use external::{MediaTracks, check_dependency};
pub use framework::{FfmpegFramework, MediaFramework};
pub use host::{METHOD_TABLE, MethodSpec};
pub use media_path::MediaPath;
pub use payload::{ConvertedAudio, MergedOutput, SeparatedTracks};
