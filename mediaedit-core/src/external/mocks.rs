// mediaedit-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.
#![cfg(any(test, feature = "test-mocks"))]

use super::{FfmpegProcess, FfmpegSpawner, FfprobeExecutor, MediaTracks};
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Bytes written into dummy outputs so produced files are non-empty.
pub const DUMMY_OUTPUT_CONTENT: &[u8] = b"mock media output";

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
    /// Pause before each emitted event, to simulate a long-running export.
    pub event_delay: Option<Duration>,
    /// Set once `kill` has been called.
    pub killed: Arc<AtomicBool>,
}

impl MockFfmpegProcess {
    pub fn new(events: Vec<FfmpegEvent>, exit_code: i32) -> Self {
        Self {
            events_to_emit: events,
            exit_status: ExitStatus::from_raw(exit_code),
            event_delay: None,
            killed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_event_delay(mut self, delay: Duration) -> Self {
        self.event_delay = Some(delay);
        self
    }
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.clone() {
            if let Some(delay) = self.event_delay {
                std::thread::sleep(delay);
            }
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.killed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawned command is matched against the first expectation whose
/// pattern occurs in any argument; matched expectations are consumed.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Arc<Mutex<Vec<MockFfmpegExpectation>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations
            .lock()
            .unwrap()
            .push(MockFfmpegExpectation {
                arg_pattern: arg_pattern.to_string(),
                result,
                create_dummy_output,
            });
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, events: Vec<FfmpegEvent>) {
        self.add_expectation(arg_pattern, Ok(MockFfmpegProcess::new(events, 0)), true);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        self.add_expectation(
            arg_pattern,
            Ok(MockFfmpegProcess::new(events, exit_code)),
            false,
        );
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.lock().unwrap().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.lock().unwrap().push(args.clone());

        let expectation = {
            let mut expectations = self.expectations.lock().unwrap();
            let found_index = expectations
                .iter()
                .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));
            match found_index {
                Some(index) => expectations.remove(index),
                None => {
                    log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
                    panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
                }
            }
        };
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        let process = expectation.result?;
        if expectation.create_dummy_output {
            match args.last() {
                Some(output_path) => {
                    if let Err(e) = std::fs::write(output_path, DUMMY_OUTPUT_CONTENT) {
                        log::error!("MockFfmpegSpawner failed to write dummy output {output_path}: {e}");
                    }
                }
                None => log::warn!("MockFfmpegSpawner couldn't find output path in args to create dummy file."),
            }
        }
        Ok(process)
    }
}

/// Mock implementation of FfprobeExecutor keyed by input path.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    track_results: Arc<Mutex<HashMap<PathBuf, MediaTracks>>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the tracks reported for a specific input path.
    pub fn expect_tracks(&self, input_path: &Path, tracks: MediaTracks) {
        self.track_results
            .lock()
            .unwrap()
            .insert(input_path.to_path_buf(), tracks);
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn probe_tracks(&self, input_path: &Path) -> CoreResult<MediaTracks> {
        log::info!("MockFfprobeExecutor::probe_tracks called for: {}", input_path.display());
        self.track_results
            .lock()
            .unwrap()
            .get(input_path)
            .cloned()
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "'{}' is not a recognized media container: mock has no tracks",
                    input_path.display()
                ))
            })
    }
}
