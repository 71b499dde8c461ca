//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command. Bridge
//! commands share a [`Session`] that owns the tokio runtime and the bridge.

pub mod doctor;
pub mod invoke;
pub mod operations;

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

use mediaedit_core::{
    BridgeConfig, BridgeConfigBuilder, FfmpegFramework, MediaEditBridge, PendingOperation,
    Settlement,
};
use serde::Serialize;
use std::process::ExitCode;
use tokio::runtime::{Builder, Runtime};

/// Exit status used when an operation settles with a rejection.
pub const REJECTED_EXIT_CODE: u8 = 2;

/// Builds the bridge configuration from global CLI flags.
pub fn bridge_config(cli: &Cli) -> CliResult<BridgeConfig> {
    let mut builder = BridgeConfigBuilder::new()
        .mix_policy(cli.mix_policy)
        .optimize_for_network(!cli.no_faststart);
    if let Some(dir) = &cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(kbps) = cli.audio_bitrate {
        builder = builder.audio_bitrate_kbps(kbps);
    }
    builder.build().cli_context("invalid bridge configuration")
}

/// Runtime plus bridge for the lifetime of one CLI invocation.
const WORKER_THREAD_NAME: &str = "mediaedit-worker";

pub struct Session {
    // Declared first so the bridge is dropped before its runtime.
    bridge: MediaEditBridge,
    runtime: Runtime,
    json: bool,
}

impl Session {
    pub fn start(config: BridgeConfig, json: bool) -> CliResult<Self> {
        let runtime = Builder::new_multi_thread()
            .enable_time()
            .thread_name(WORKER_THREAD_NAME)
            .build()
            .cli_with_context(|| format!("failed to start async runtime ({WORKER_THREAD_NAME})"))?;
        let bridge =
            MediaEditBridge::new(FfmpegFramework::default(), config, runtime.handle().clone())?;
        log::debug!(
            "Bridge ready (output dir: {}, mix policy: {})",
            bridge.config().output_dir.display(),
            bridge.config().mix_policy
        );
        Ok(Self {
            bridge,
            runtime,
            json,
        })
    }

    pub fn bridge(&self) -> &MediaEditBridge {
        &self.bridge
    }

    pub fn json(&self) -> bool {
        self.json
    }

    /// Blocks until `pending` settles, showing a spinner unless output is JSON.
    pub fn wait<T>(&self, label: &str, pending: PendingOperation<T>) -> Settlement<T> {
        let spinner = output::spinner(label, !self.json);
        let outcome = self.runtime.block_on(pending);
        spinner.finish_and_clear();
        outcome
    }
}

/// Prints a settlement and maps it to the process exit status.
pub fn report<T, R>(json: bool, outcome: Settlement<T>, render: R) -> ExitCode
where
    T: Serialize,
    R: FnOnce(&T),
{
    match outcome {
        Ok(payload) => {
            if json {
                output::print_json(&payload);
            } else {
                render(&payload);
            }
            ExitCode::SUCCESS
        }
        Err(rejection) => {
            output::print_rejection(&rejection);
            ExitCode::from(REJECTED_EXIT_CODE)
        }
    }
}
