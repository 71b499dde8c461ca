// ============================================================================
// mediaedit-cli/src/commands/operations.rs
// ============================================================================
//
// TRACK COMMANDS: separate, merge and convert
//
// Each command starts one bridge operation, waits for it to settle and
// reports the payload or rejection.

use super::{Session, report};
use crate::output::print_info;

use log::info;
use std::process::ExitCode;

/// Execute the separate command.
pub fn run_separate(session: &Session, video: &str) -> ExitCode {
    info!("Separating audio and video tracks of {video}");
    let outcome = session.wait(
        "Separating audio and video",
        session.bridge().separate_audio_video(video),
    );
    report(session.json(), outcome, |tracks| {
        print_info("Audio", tracks.audio_path.display());
        print_info("Video", tracks.video_path.display());
    })
}

/// Execute the merge command.
pub fn run_merge(session: &Session, video: &str, audio: &str) -> ExitCode {
    info!(
        "Merging {audio} into {video} ({} policy)",
        session.bridge().config().mix_policy
    );
    let outcome = session.wait(
        "Merging audio with video",
        session.bridge().merge_audio_with_video(video, audio),
    );
    report(session.json(), outcome, |merged| {
        print_info("Output", merged.output_path.display());
    })
}

/// Execute the convert command.
pub fn run_convert(session: &Session, mp3: &str) -> ExitCode {
    info!("Converting {mp3} to AAC");
    let outcome = session.wait("Converting audio", session.bridge().convert_mp3_to_m4a(mp3));
    report(session.json(), outcome, |converted| {
        print_info("Output", converted.output_path.display());
    })
}
