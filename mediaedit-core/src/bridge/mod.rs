// ============================================================================
// mediaedit-core/src/bridge/mod.rs
// ============================================================================
//
// MEDIA EDIT BRIDGE: Host-Facing Asynchronous Operations
//
// Every operation follows the same path: register a cancellation flag, hand
// the work to a blocking worker on the bridge's tokio runtime, and return a
// PendingOperation immediately. The worker validates the host's paths,
// delegates to the MediaFramework, converts any CoreError (or panic) into a
// Rejection, and settles the operation exactly once.

pub mod pending;

use crate::cancel::{ActiveOperations, CancellationFlag};
use crate::config::BridgeConfig;
use crate::error::{CoreError, CoreResult, ErrorKind, Rejection};
use crate::framework::{FfmpegFramework, MediaFramework};
use crate::media_path::MediaPath;
use crate::payload::{ConvertedAudio, MergedOutput, SeparatedTracks};

use pending::{PendingOperation, channel};

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;

/// Asynchronous media editing operations backed by a `MediaFramework`.
///
/// Operations are independent of each other and may run concurrently; each
/// returns a `PendingOperation` that settles exactly once.
///
/// # Examples
///
/// ```rust,no_run
/// use mediaedit_core::MediaEditBridge;
/// use mediaedit_core::config::{AudioMixPolicy, BridgeConfigBuilder};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BridgeConfigBuilder::new()
///     .mix_policy(AudioMixPolicy::Replace)
///     .build()?;
/// let bridge = MediaEditBridge::with_ffmpeg(config)?;
///
/// let tracks = bridge.separate_audio_video("/videos/clip.mp4").await?;
/// println!("audio: {}", tracks.audio_path.display());
///
/// let merged = bridge
///     .merge_audio_with_video(
///         tracks.video_path.to_str().unwrap(),
///         "/music/score.m4a",
///     )
///     .await?;
/// println!("merged: {}", merged.output_path.display());
/// # Ok(())
/// # }
/// ```
pub struct MediaEditBridge<F: MediaFramework = FfmpegFramework> {
    framework: Arc<F>,
    config: Arc<BridgeConfig>,
    runtime: Handle,
    active: Arc<ActiveOperations>,
}

impl MediaEditBridge<FfmpegFramework> {
    /// Creates a bridge backed by ffmpeg/ffprobe, using the current tokio runtime.
    pub fn with_ffmpeg(config: BridgeConfig) -> CoreResult<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            CoreError::Config(format!("a tokio runtime is required to host the bridge: {e}"))
        })?;
        Self::new(FfmpegFramework::default(), config, runtime)
    }
}

impl<F: MediaFramework> MediaEditBridge<F> {
    /// Creates a bridge that runs its work on `runtime`.
    pub fn new(framework: F, config: BridgeConfig, runtime: Handle) -> CoreResult<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.output_dir)?;
        Ok(Self {
            framework: Arc::new(framework),
            config: Arc::new(config),
            runtime,
            active: Arc::new(ActiveOperations::default()),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Splits a video into separate audio (`.m4a`) and video (`.mp4`) files.
    pub fn separate_audio_video(&self, video_path: &str) -> PendingOperation<SeparatedTracks> {
        let video_path = video_path.to_owned();
        self.dispatch("separateAudioVideo", move |framework, config, cancel| {
            let video = MediaPath::parse(&video_path)?;
            framework.split_tracks(config, &video, cancel)
        })
    }

    /// Writes a new video whose soundtrack comes from `audio_path`.
    pub fn merge_audio_with_video(
        &self,
        video_path: &str,
        audio_path: &str,
    ) -> PendingOperation<MergedOutput> {
        let video_path = video_path.to_owned();
        let audio_path = audio_path.to_owned();
        self.dispatch("mergeAudioWithVideo", move |framework, config, cancel| {
            let video = MediaPath::parse(&video_path)?;
            let audio = MediaPath::parse(&audio_path)?;
            framework.compose_tracks(config, &video, &audio, cancel)
        })
    }

    /// Converts an MP3 (or any file with an audio track) to AAC in an M4A container.
    pub fn convert_mp3_to_m4a(&self, mp3_path: &str) -> PendingOperation<ConvertedAudio> {
        let mp3_path = mp3_path.to_owned();
        self.dispatch("convertMp3ToM4a", move |framework, config, cancel| {
            let input = MediaPath::parse(&mp3_path)?;
            framework.transcode_audio(config, &input, cancel)
        })
    }

    /// Cancels every operation in flight right now; returns how many were signalled.
    ///
    /// Cancelled operations reject with `CANCELLED` unless they were already
    /// past their last export session.
    pub fn cancel_processing(&self) -> usize {
        let cancelled = self.active.cancel_all();
        if cancelled == 0 {
            log::info!("[cancelProcessing] No active operation to cancel");
        } else {
            log::info!("[cancelProcessing] Cancelling {cancelled} active operation(s)");
        }
        cancelled
    }

    /// Number of operations dispatched but not yet settled.
    pub fn active_operations(&self) -> usize {
        self.active.len()
    }

    fn dispatch<T, W>(&self, method: &'static str, work: W) -> PendingOperation<T>
    where
        T: Send + 'static,
        W: FnOnce(&F, &BridgeConfig, &CancellationFlag) -> CoreResult<T> + Send + 'static,
    {
        let (resolver, pending) = channel();
        let framework = Arc::clone(&self.framework);
        let config = Arc::clone(&self.config);
        let guard = self.active.register();

        self.runtime.spawn_blocking(move || {
            let started = Instant::now();
            log::info!("[{method}] started");

            let outcome = catch_unwind(AssertUnwindSafe(|| {
                work(&framework, &config, guard.flag())
            }));
            drop(guard);

            match outcome {
                Ok(Ok(value)) => {
                    log::info!("[{method}] completed in {:.2?}", started.elapsed());
                    resolver.resolve(value);
                }
                Ok(Err(err)) => {
                    let rejection = Rejection::from(err);
                    log::warn!("[{method}] rejected: {rejection}");
                    resolver.reject(rejection);
                }
                Err(panic) => {
                    let rejection = Rejection::new(ErrorKind::Unknown, panic_message(&*panic));
                    log::error!("[{method}] worker panicked: {}", rejection.message);
                    resolver.reject(rejection);
                }
            }
        });

        pending
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("internal error: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("internal error: {message}")
    } else {
        "internal error".to_string()
    }
}
