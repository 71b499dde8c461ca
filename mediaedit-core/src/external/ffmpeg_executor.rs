// ============================================================================
// mediaedit-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes, plus the single routine every export session goes through:
// spawn, drain events while watching for cancellation, wait, and translate
// the exit status into a CoreResult.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - run_ffmpeg: Export session driver with cooperative cancellation

use crate::cancel::CancellationFlag;
use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;

    /// Terminates the process.
    fn kill(&mut self) -> CoreResult<()>;
}

/// Trait representing something that can spawn an FfmpegProcess.
///
/// Spawners are shared between concurrently running operations, hence the
/// `Send + Sync` bound.
pub trait FfmpegSpawner: Send + Sync {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            CoreError::ExportFailed(format!("cannot read ffmpeg output: {e}"))
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.0
            .kill()
            .map_err(|e| command_wait_error("ffmpeg (sidecar kill)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

// --- Export Session Driver ---

/// Runs one ffmpeg export session to completion.
///
/// The flag is checked before spawning and on every event ffmpeg emits. A
/// raised flag kills the child and yields `CoreError::Cancelled`. Error lines
/// reported by ffmpeg are collected and attached to a non-zero exit.
pub fn run_ffmpeg<S: FfmpegSpawner>(
    spawner: &S,
    cmd: FfmpegCommand,
    context: &str,
    cancel: &CancellationFlag,
) -> CoreResult<()> {
    if cancel.is_cancelled() {
        log::info!("{context}: cancelled before start");
        return Err(CoreError::Cancelled);
    }

    log::debug!("Running {context} command: {:?}", cmd);
    let mut process = spawner.spawn(cmd)?;

    let mut error_lines: Vec<String> = Vec::new();
    let drained = process.handle_events(|event| {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        match event {
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) | FfmpegEvent::Error(line) => {
                log::debug!("{context}: {line}");
                error_lines.push(line);
            }
            FfmpegEvent::Log(LogLevel::Warning, line) => {
                log::debug!("{context} warning: {line}");
            }
            FfmpegEvent::Progress(progress) => {
                log::trace!("{context} progress: time={} speed={}", progress.time, progress.speed);
            }
            _ => {}
        }
        Ok(())
    });

    if let Err(err) = drained {
        if matches!(err, CoreError::Cancelled) {
            log::warn!("{context}: cancellation requested, stopping ffmpeg");
        } else {
            log::error!("{context}: {err}");
        }
        if let Err(kill_err) = process.kill() {
            log::debug!("{context}: kill after abort failed: {kill_err}");
        }
        // Reap the child; its status no longer matters.
        let _ = process.wait();
        return Err(err);
    }

    let status = process.wait()?;
    if !status.success() {
        log::error!("{context} failed: {status}");
        let stderr = if error_lines.is_empty() {
            "no error output captured".to_string()
        } else {
            error_lines.join("\n")
        };
        return Err(command_failed_error(context, status, stderr));
    }

    log::debug!("{context} completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MockFfmpegProcess, MockFfmpegSpawner};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn command() -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new();
        cmd.input("/in/clip.mp4");
        cmd.output("/out/session.m4a");
        cmd
    }

    fn info_events(count: usize) -> Vec<FfmpegEvent> {
        (0..count)
            .map(|i| FfmpegEvent::Log(LogLevel::Info, format!("frame {i}")))
            .collect()
    }

    #[test]
    fn test_failed_exit_carries_error_lines() {
        let spawner = MockFfmpegSpawner::new();
        let events = vec![FfmpegEvent::Log(
            LogLevel::Error,
            "Invalid data found when processing input".to_string(),
        )];
        spawner.add_exit_error_expectation("session", events, 1);

        let err = run_ffmpeg(&spawner, command(), "ffmpeg (test)", &CancellationFlag::new())
            .unwrap_err();

        match err {
            CoreError::CommandFailed(context, _, stderr) => {
                assert_eq!(context, "ffmpeg (test)");
                assert!(stderr.contains("Invalid data found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cancellation_mid_session_kills_process() {
        let spawner = MockFfmpegSpawner::new();
        let process =
            MockFfmpegProcess::new(info_events(50), 0).with_event_delay(Duration::from_millis(10));
        let killed = process.killed.clone();
        spawner.add_expectation("session", Ok(process), false);

        let cancel = CancellationFlag::new();
        let remote = cancel.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(40));
            remote.cancel();
        });

        let err = run_ffmpeg(&spawner, command(), "ffmpeg (test)", &cancel).unwrap_err();
        canceller.join().unwrap();

        assert!(matches!(err, CoreError::Cancelled));
        assert!(killed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_spawn_error_is_propagated() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_spawn_error_expectation(
            "session",
            CoreError::DependencyNotFound("ffmpeg".to_string()),
        );

        let err = run_ffmpeg(&spawner, command(), "ffmpeg (test)", &CancellationFlag::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(_)));
    }
}
